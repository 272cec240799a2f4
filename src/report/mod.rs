pub mod catalog;
pub mod download;
pub mod json;
pub mod terminal;

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{TriggerResult, ValidationError};
use crate::page::{Alerter, Link, LinkTarget, Navigator, ReportSink, ReportView, ValueSource};
use crate::transport::Transport;

/// How a report for the selected scan is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Navigate to the generated file so it downloads
    Redirect,
    /// Fetch the JSON report and show it with a download link
    #[default]
    Render,
}

impl ReportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Redirect => "redirect",
            ReportMode::Render => "render",
        }
    }
}

impl std::fmt::Display for ReportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redirect" | "download" => Ok(ReportMode::Redirect),
            "render" | "inline" => Ok(ReportMode::Render),
            _ => Err(anyhow::anyhow!(
                "Unknown report mode: '{}'. Valid options: redirect, render",
                s
            )),
        }
    }
}

pub fn generate_report_path(scan_id: &str) -> String {
    format!("/generate-report/{}", scan_id)
}

pub fn report_path(scan_id: &str) -> String {
    format!("/report?scan={}", scan_id)
}

pub fn download_path(scan_id: &str) -> String {
    format!("/download?scan={}", scan_id)
}

/// The handles a requester needs, which depend on the mode.
pub enum ReportAction {
    Redirect {
        link: Arc<dyn LinkTarget>,
        navigator: Arc<dyn Navigator>,
    },
    Render {
        transport: Arc<dyn Transport>,
        output: Arc<dyn ReportSink>,
    },
}

impl ReportAction {
    pub fn mode(&self) -> ReportMode {
        match self {
            ReportAction::Redirect { .. } => ReportMode::Redirect,
            ReportAction::Render { .. } => ReportMode::Render,
        }
    }
}

/// Result of a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Navigated(String),
    Rendered(ReportView),
}

/// Generates and retrieves the report of the selected scan.
pub struct ReportRequester {
    scan_select: Arc<dyn ValueSource>,
    alerts: Arc<dyn Alerter>,
    action: ReportAction,
}

impl ReportRequester {
    pub fn new(
        scan_select: Arc<dyn ValueSource>,
        alerts: Arc<dyn Alerter>,
        action: ReportAction,
    ) -> Self {
        ReportRequester {
            scan_select,
            alerts,
            action,
        }
    }

    pub fn mode(&self) -> ReportMode {
        self.action.mode()
    }

    /// Handle a form submit / generate-report click.
    pub async fn submit(&self) -> TriggerResult<ReportOutcome> {
        let selected = self.scan_select.value();
        let scan_id = selected.trim();
        if scan_id.is_empty() {
            let err = ValidationError::MissingScan;
            self.alerts.alert(&err.to_string());
            return Err(err.into());
        }

        match &self.action {
            ReportAction::Redirect { link, navigator } => {
                let href = generate_report_path(scan_id);
                link.set_href(&href);
                info!("Navigating to {}", href);
                if let Err(e) = navigator.navigate(&href).await {
                    warn!("Navigation to {} failed: {}", href, e);
                    self.alerts
                        .alert(&format!("Failed to generate report: {}", e));
                    return Err(e.into());
                }
                Ok(ReportOutcome::Navigated(href))
            }
            ReportAction::Render { transport, output } => {
                let path = report_path(scan_id);
                info!("Requesting report {}", path);
                let rendered = async {
                    let reply = transport.get_json(&path).await?;
                    json::render(&reply.body)
                }
                .await;

                match rendered {
                    Ok(preformatted) => {
                        let view = ReportView {
                            preformatted,
                            download: Link {
                                href: download_path(scan_id),
                                label: "Download Report".to_string(),
                                download: true,
                            },
                        };
                        output.render(&view);
                        Ok(ReportOutcome::Rendered(view))
                    }
                    Err(e) => {
                        warn!("Report {} failed: {}", path, e);
                        self.alerts
                            .alert(&format!("Failed to generate report: {}", e));
                        Err(e.into())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::testing::*;
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    fn render_requester(
        scan: &str,
        transport: Arc<MockTransport>,
    ) -> (ReportRequester, Arc<RecordingAlerts>, Arc<RecordingReport>) {
        let alerts = Arc::new(RecordingAlerts::default());
        let output = Arc::new(RecordingReport::default());
        let requester = ReportRequester::new(
            Arc::new(FixedValue::new(scan)),
            alerts.clone(),
            ReportAction::Render {
                transport,
                output: output.clone(),
            },
        );
        (requester, alerts, output)
    }

    fn redirect_requester(
        scan: &str,
        navigator: Arc<RecordingNavigator>,
    ) -> (ReportRequester, Arc<RecordingAlerts>, Arc<RecordingLink>) {
        let alerts = Arc::new(RecordingAlerts::default());
        let link = Arc::new(RecordingLink::default());
        let requester = ReportRequester::new(
            Arc::new(FixedValue::new(scan)),
            alerts.clone(),
            ReportAction::Redirect {
                link: link.clone(),
                navigator,
            },
        );
        (requester, alerts, link)
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("redirect".parse::<ReportMode>().unwrap(), ReportMode::Redirect);
        assert_eq!("RENDER".parse::<ReportMode>().unwrap(), ReportMode::Render);
        assert!("pdf".parse::<ReportMode>().is_err());
        assert_eq!(ReportMode::default(), ReportMode::Render);
    }

    #[tokio::test]
    async fn redirect_navigates_to_generated_report() {
        let navigator = Arc::new(RecordingNavigator::default());
        let (requester, alerts, link) = redirect_requester("17", navigator.clone());

        let outcome = requester.submit().await.unwrap();

        assert_eq!(outcome, ReportOutcome::Navigated("/generate-report/17".into()));
        assert_eq!(link.0.lock().unwrap().as_deref(), Some("/generate-report/17"));
        assert_eq!(*navigator.visited.lock().unwrap(), vec!["/generate-report/17"]);
        assert!(alerts.all().is_empty());
    }

    #[tokio::test]
    async fn empty_selection_never_navigates() {
        for blank in ["", "   ", "\t"] {
            let navigator = Arc::new(RecordingNavigator::default());
            let (requester, alerts, link) = redirect_requester(blank, navigator.clone());

            let err = requester.submit().await.unwrap_err();

            assert!(err.is_validation());
            assert_eq!(alerts.all(), vec!["Please select a scan."]);
            assert!(navigator.visited.lock().unwrap().is_empty());
            assert!(link.0.lock().unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn failed_navigation_alerts() {
        let navigator = Arc::new(RecordingNavigator {
            fail_with: Some("server answered 404".into()),
            ..Default::default()
        });
        let (requester, alerts, _) = redirect_requester("3", navigator);

        assert!(requester.submit().await.is_err());
        assert_eq!(
            alerts.all(),
            vec!["Failed to generate report: server answered 404"]
        );
    }

    #[tokio::test]
    async fn render_fetches_report_and_links_download() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_json(json!({"scan_id": "9", "findings": []}));
        let (requester, alerts, output) = render_requester("9", transport.clone());

        requester.submit().await.unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, "GET");
        assert_eq!(sent[0].path, "/report?scan=9");

        let views = output.0.lock().unwrap();
        assert_eq!(
            views[0].preformatted,
            "{\n  \"scan_id\": \"9\",\n  \"findings\": []\n}"
        );
        assert_eq!(views[0].download.href, "/download?scan=9");
        assert!(views[0].download.download);
        assert!(alerts.all().is_empty());
    }

    #[tokio::test]
    async fn render_failure_alerts_with_reason() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_failure("connection refused");
        let (requester, alerts, output) = render_requester("9", transport);

        assert!(requester.submit().await.is_err());
        assert_eq!(
            alerts.all(),
            vec!["Failed to generate report: connection refused"]
        );
        assert!(output.0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn render_with_empty_selection_sends_nothing() {
        let transport = Arc::new(MockTransport::new());
        let (requester, alerts, _) = render_requester(" ", transport.clone());

        assert!(requester.submit().await.unwrap_err().is_validation());
        assert!(transport.sent().is_empty());
        assert_eq!(alerts.all(), vec!["Please select a scan."]);
    }
}
