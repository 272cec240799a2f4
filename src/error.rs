use thiserror::Error;

/// A required form value was empty. The message is the exact alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid API endpoint!")]
    MissingEndpoint,

    #[error("Please select a scan.")]
    MissingScan,
}

/// Anything that went wrong between issuing a request and handing its
/// result to the page.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),

    #[error("server answered {status} for {path}")]
    Status { status: u16, path: String },

    /// Non-2xx answer carrying the backend's `{"error": ...}` message
    #[error("{message} ({status})")]
    Rejected { status: u16, message: String },

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Failure injected by the test transport and element doubles.
    #[cfg(test)]
    #[error("{0}")]
    Transport(String),
}

/// The two ways a user action can end early.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestError),
}

impl TriggerError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TriggerError::Validation(_))
    }
}

pub type TriggerResult<T> = Result<T, TriggerError>;
