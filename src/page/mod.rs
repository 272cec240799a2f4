//! The element surface the triggers are bound to.
//!
//! Every behaviour receives the handles it touches when it is built, so
//! nothing looks elements up globally. `terminal` holds the handles used
//! by the CLI; tests use the recording doubles in `testing`.

pub mod terminal;

use async_trait::async_trait;

use crate::error::RequestError;

/// Identifiers of the elements a host page has to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    ReportForm,
    ScanSelect,
    GenerateReport,
    ApiEndpoint,
    RunScanWeb,
    ResultsOutput,
    ReportOutput,
    Loader,
    Content,
}

impl ElementId {
    pub const ALL: [ElementId; 9] = [
        ElementId::ReportForm,
        ElementId::ScanSelect,
        ElementId::GenerateReport,
        ElementId::ApiEndpoint,
        ElementId::RunScanWeb,
        ElementId::ResultsOutput,
        ElementId::ReportOutput,
        ElementId::Loader,
        ElementId::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::ReportForm => "report-form",
            ElementId::ScanSelect => "scan-select",
            ElementId::GenerateReport => "generate-report",
            ElementId::ApiEndpoint => "api-endpoint",
            ElementId::RunScanWeb => "run-scan-web",
            ElementId::ResultsOutput => "results-output",
            ElementId::ReportOutput => "report-output",
            ElementId::Loader => "loader",
            ElementId::Content => "content",
        }
    }

    /// What the element is used for, shown by `argus routes`.
    pub fn role(&self) -> &'static str {
        match self {
            ElementId::ReportForm => "form submitted to request a report",
            ElementId::ScanSelect => "dropdown holding the selected scan id",
            ElementId::GenerateReport => "link/button that triggers report generation",
            ElementId::ApiEndpoint => "input holding the endpoint to scan",
            ElementId::RunScanWeb => "button that starts a scan",
            ElementId::ResultsOutput => "text output for scan results",
            ElementId::ReportOutput => "container for the rendered report",
            ElementId::Loader => "loading indicator",
            ElementId::Content => "content container revealed after loading",
        }
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

/// CSS-style display state of a toggled element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Block,
}

/// A hyperlink rendered into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    pub label: String,
    /// Marked for download rather than navigation
    pub download: bool,
}

/// What the report output container shows after a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    /// Indented JSON, shown preformatted
    pub preformatted: String,
    pub download: Link,
}

/// An input or select element.
pub trait ValueSource: Send + Sync {
    fn value(&self) -> String;
}

/// An element whose text content can be replaced.
pub trait TextSink: Send + Sync {
    fn set_text(&self, text: &str);
}

/// The container a rendered report is injected into.
pub trait ReportSink: Send + Sync {
    fn render(&self, view: &ReportView);
}

/// Blocking user-facing alert.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}

/// An element with a link target.
pub trait LinkTarget: Send + Sync {
    fn set_href(&self, href: &str);
}

/// An element that can be shown or hidden.
pub trait Toggle: Send + Sync {
    fn set_display(&self, display: Display);
}

/// Leaves the current page for `href`.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn navigate(&self, href: &str) -> Result<(), RequestError>;
}

#[cfg(test)]
pub mod testing {
    //! Recording element doubles.

    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// In-memory writer shared between a test and the code under test.
    /// Also captures `tracing` output.
    #[derive(Clone, Default)]
    pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }

        /// Route this thread's log events into the buffer until the guard
        /// is dropped.
        pub fn capture_logs(&self) -> tracing::subscriber::DefaultGuard {
            let sink = self.clone();
            let subscriber = tracing_subscriber::fmt()
                .with_writer(move || sink.clone())
                .with_ansi(false)
                .with_target(false)
                .without_time()
                .finish();
            tracing::subscriber::set_default(subscriber)
        }
    }

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    pub struct FixedValue(pub String);

    impl FixedValue {
        pub fn new(value: &str) -> Self {
            FixedValue(value.to_string())
        }
    }

    impl ValueSource for FixedValue {
        fn value(&self) -> String {
            self.0.clone()
        }
    }

    #[derive(Default)]
    pub struct RecordingText(pub Mutex<Vec<String>>);

    impl RecordingText {
        pub fn last(&self) -> Option<String> {
            self.0.lock().unwrap().last().cloned()
        }
    }

    impl TextSink for RecordingText {
        fn set_text(&self, text: &str) {
            self.0.lock().unwrap().push(text.to_string());
        }
    }

    #[derive(Default)]
    pub struct RecordingAlerts(pub Mutex<Vec<String>>);

    impl RecordingAlerts {
        pub fn all(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Alerter for RecordingAlerts {
        fn alert(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[derive(Default)]
    pub struct RecordingReport(pub Mutex<Vec<ReportView>>);

    impl ReportSink for RecordingReport {
        fn render(&self, view: &ReportView) {
            self.0.lock().unwrap().push(view.clone());
        }
    }

    #[derive(Default)]
    pub struct RecordingLink(pub Mutex<Option<String>>);

    impl LinkTarget for RecordingLink {
        fn set_href(&self, href: &str) {
            *self.0.lock().unwrap() = Some(href.to_string());
        }
    }

    #[derive(Default)]
    pub struct RecordingToggle(pub Mutex<Vec<Display>>);

    impl RecordingToggle {
        pub fn history(&self) -> Vec<Display> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Toggle for RecordingToggle {
        fn set_display(&self, display: Display) {
            self.0.lock().unwrap().push(display);
        }
    }

    #[derive(Default)]
    pub struct RecordingNavigator {
        pub visited: Mutex<Vec<String>>,
        pub fail_with: Option<String>,
    }

    #[async_trait]
    impl Navigator for RecordingNavigator {
        async fn navigate(&self, href: &str) -> Result<(), RequestError> {
            self.visited.lock().unwrap().push(href.to_string());
            match &self.fail_with {
                Some(msg) => Err(RequestError::Transport(msg.clone())),
                None => Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ids_cover_the_page_surface() {
        let ids: Vec<&str> = ElementId::ALL.iter().map(|e| e.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "report-form",
                "scan-select",
                "generate-report",
                "api-endpoint",
                "run-scan-web",
                "results-output",
                "report-output",
                "loader",
                "content",
            ]
        );
        assert_eq!(ElementId::Loader.to_string(), "#loader");
    }
}
