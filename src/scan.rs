use std::sync::Arc;

use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::{RequestError, TriggerResult, ValidationError};
use crate::page::{Alerter, TextSink, ValueSource};
use crate::transport::Transport;

pub const SCAN_PATH: &str = "/scan";

/// Starts a scan of the endpoint typed into the input element and shows
/// the server's answer in the results element.
pub struct ScanTrigger {
    endpoint: Arc<dyn ValueSource>,
    output: Arc<dyn TextSink>,
    alerts: Arc<dyn Alerter>,
    transport: Arc<dyn Transport>,
}

impl ScanTrigger {
    pub fn new(
        endpoint: Arc<dyn ValueSource>,
        output: Arc<dyn TextSink>,
        alerts: Arc<dyn Alerter>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        ScanTrigger {
            endpoint,
            output,
            alerts,
            transport,
        }
    }

    /// Handle a click on the run-scan button.
    ///
    /// Returns the server's JSON answer. Failures have already been written
    /// to the output element when this returns `Err`.
    pub async fn click(&self) -> TriggerResult<Value> {
        let endpoint = self.endpoint.value();
        if endpoint.trim().is_empty() {
            let err = ValidationError::MissingEndpoint;
            self.alerts.alert(&err.to_string());
            return Err(err.into());
        }

        info!("Requesting scan of {}", endpoint);
        match self.request(&endpoint).await {
            Ok((body, text)) => {
                self.output.set_text(&text);
                Ok(body)
            }
            Err(e) => {
                warn!("Scan request failed: {}", e);
                self.output.set_text(&format!("Error: {}", e));
                Err(e.into())
            }
        }
    }

    async fn request(&self, endpoint: &str) -> Result<(Value, String), RequestError> {
        let reply = self
            .transport
            .post_json(SCAN_PATH, &json!({ "endpoint": endpoint }))
            .await?;
        let text = crate::report::json::render(&reply.body)?;
        Ok((reply.body, text))
    }
}
