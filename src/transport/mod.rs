//! HTTP access to the Argus backend.
//!
//! Triggers only see the `Transport` trait; the CLI plugs in
//! `HttpTransport`, tests plug in `MockTransport`.

pub mod http;
#[cfg(test)]
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RequestError;

pub use http::HttpTransport;

/// A JSON response. The status is kept because a non-2xx answer with a
/// JSON body is still shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub status: u16,
    pub body: Value,
}

/// A file response.
#[derive(Debug, Clone, PartialEq)]
pub struct FileReply {
    /// Raw `Content-Disposition` header, if any
    pub disposition: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as `application/json` and parse the answer as JSON
    async fn post_json(&self, path: &str, body: &Value) -> Result<JsonReply, RequestError>;

    /// GET and parse the answer as JSON
    async fn get_json(&self, path: &str) -> Result<JsonReply, RequestError>;

    /// GET a file; non-2xx answers are errors
    async fn get_file(&self, path: &str) -> Result<FileReply, RequestError>;

    /// Absolute URL for a server path, for display
    fn resolve(&self, path: &str) -> String;
}
