use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::error::{RequestError, TriggerResult, ValidationError};
use crate::transport::{JsonReply, Transport};

/// Lifecycle status the backend reports for a scan
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Starting,
    DiscoveringEndpoints,
    Scanning,
    Completed,
    Error,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ScanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanStatus::Starting => "starting",
            ScanStatus::DiscoveringEndpoints => "discovering endpoints",
            ScanStatus::Scanning => "scanning",
            ScanStatus::Completed => "completed",
            ScanStatus::Error => "error",
            ScanStatus::Unknown => "unknown",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, ScanStatus::Completed | ScanStatus::Error)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the scan listing, i.e. one option of the scan selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    #[serde(deserialize_with = "id_string")]
    pub scan_id: String,

    #[serde(default)]
    pub status: ScanStatus,

    /// Endpoint the scan was started against
    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub start_time: Option<String>,
}

impl std::fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  {} ({})", self.scan_id, self.target, self.status)
    }
}

/// Scan ids are strings on the reference backend, integers on others
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "scan_id must be a string or number, got {}",
            other
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct ScanListing {
    #[serde(default)]
    scans: Vec<ScanSummary>,
}

/// Parse a `{"scans": [...]}` listing body
pub fn parse_listing(body: Value) -> Result<Vec<ScanSummary>, RequestError> {
    let listing: ScanListing = serde_json::from_value(body)?;
    Ok(listing.scans)
}

/// State of a single scan. `results` is only filled in once the scan has
/// completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanDetail {
    #[serde(deserialize_with = "id_string")]
    pub scan_id: String,

    #[serde(default)]
    pub status: ScanStatus,

    #[serde(default)]
    pub target: String,

    #[serde(default)]
    pub results: Option<Value>,
}

/// Path of the status lookup for one scan
pub fn scan_status_path(prefix: &str, scan_id: &str) -> String {
    format!("{}/{}", prefix.trim_end_matches('/'), scan_id)
}

/// Turn a non-2xx answer into an error, keeping the backend's message
fn expect_success(reply: JsonReply, path: &str) -> Result<Value, RequestError> {
    if (200..300).contains(&reply.status) {
        return Ok(reply.body);
    }
    match reply.body.get("error").and_then(Value::as_str) {
        Some(message) => Err(RequestError::Rejected {
            status: reply.status,
            message: message.to_string(),
        }),
        None => Err(RequestError::Status {
            status: reply.status,
            path: path.to_string(),
        }),
    }
}

/// Scans known to the server: the listing behind the scan selector and
/// the per-scan status lookup
pub struct ScanCatalog {
    transport: Arc<dyn Transport>,
    scans_path: String,
    status_path: String,
}

impl ScanCatalog {
    pub fn new(transport: Arc<dyn Transport>, config: &ServerConfig) -> Self {
        ScanCatalog {
            transport,
            scans_path: config.scans_path.clone(),
            status_path: config.scan_status_path.clone(),
        }
    }

    pub async fn fetch(&self) -> Result<Vec<ScanSummary>, RequestError> {
        let reply = self.transport.get_json(&self.scans_path).await?;
        let scans = parse_listing(expect_success(reply, &self.scans_path)?)?;
        info!("Server lists {} scans", scans.len());
        for scan in &scans {
            debug!("  {} [{}] {}", scan.scan_id, scan.status, scan.target);
        }
        Ok(scans)
    }

    /// Look up one scan. An empty id is rejected before anything is sent.
    pub async fn status(&self, scan_id: &str) -> TriggerResult<ScanDetail> {
        let scan_id = scan_id.trim();
        if scan_id.is_empty() {
            return Err(ValidationError::MissingScan.into());
        }

        let path = scan_status_path(&self.status_path, scan_id);
        let reply = self.transport.get_json(&path).await?;
        let detail: ScanDetail = serde_json::from_value(expect_success(reply, &path)?)
            .map_err(RequestError::from)?;
        info!("Scan {} is {}", detail.scan_id, detail.status);
        Ok(detail)
    }
}
