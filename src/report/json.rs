use serde_json::Value;

use crate::error::RequestError;

/// Render a JSON payload with 2-space indentation, keeping key order
pub fn render(value: &Value) -> Result<String, RequestError> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(json)
}
