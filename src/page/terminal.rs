//! Element handles backed by the terminal.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use owo_colors::OwoColorize;
use tracing::debug;

use super::{Alerter, Display, LinkTarget, Navigator, ReportSink, ReportView, TextSink, Toggle, ValueSource};
use crate::error::RequestError;
use crate::report::download::{self, DownloadedReport};
use crate::report::terminal::format_report;
use crate::transport::Transport;

/// An input whose value was given on the command line or at a prompt.
pub struct Field(String);

impl Field {
    pub fn new(value: impl Into<String>) -> Self {
        Field(value.into())
    }
}

impl ValueSource for Field {
    fn value(&self) -> String {
        self.0.clone()
    }
}

/// Alerts go to stderr so they never mix with piped output.
#[derive(Default)]
pub struct TerminalAlert;

impl Alerter for TerminalAlert {
    fn alert(&self, message: &str) {
        // clear a spinner line that may still be up
        eprintln!("\r\x1b[2K  {} {}", "⚠".yellow().bold(), message.yellow().bold());
    }
}

/// Content container. Text written while it is hidden is held back and
/// written out when it is shown.
pub struct Panel {
    visible: Mutex<bool>,
    pending: Mutex<Vec<String>>,
    out: Mutex<Box<dyn Write + Send>>,
    transport: Arc<dyn Transport>,
}

impl Panel {
    /// A hidden panel printing to stdout
    pub fn hidden(transport: Arc<dyn Transport>) -> Self {
        Panel::with_writer(transport, Box::new(io::stdout()))
    }

    pub fn visible(transport: Arc<dyn Transport>) -> Self {
        let panel = Panel::hidden(transport);
        *panel.visible.lock().unwrap_or_else(|e| e.into_inner()) = true;
        panel
    }

    /// A hidden panel writing to `out`
    pub fn with_writer(transport: Arc<dyn Transport>, out: Box<dyn Write + Send>) -> Self {
        Panel {
            visible: Mutex::new(false),
            pending: Mutex::new(Vec::new()),
            out: Mutex::new(out),
            transport,
        }
    }

    fn emit(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writeln!(out, "{}", text);
        let _ = out.flush();
    }

    fn write(&self, text: String) {
        let visible = *self.visible.lock().unwrap_or_else(|e| e.into_inner());
        if visible {
            self.emit(&text);
        } else {
            self.pending
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(text);
        }
    }
}

impl TextSink for Panel {
    fn set_text(&self, text: &str) {
        self.write(text.to_string());
    }
}

impl ReportSink for Panel {
    fn render(&self, view: &ReportView) {
        let url = self.transport.resolve(&view.download.href);
        self.write(format_report(view, &url));
    }
}

impl Toggle for Panel {
    fn set_display(&self, display: Display) {
        let show = display == Display::Block;
        *self.visible.lock().unwrap_or_else(|e| e.into_inner()) = show;
        if show {
            let pending: Vec<String> = self
                .pending
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .drain(..)
                .collect();
            for text in pending {
                self.emit(&text);
            }
        }
    }
}

/// Single-line loading indicator on stderr.
pub struct Spinner {
    message: String,
    shown: Mutex<bool>,
}

impl Spinner {
    /// Create the indicator already showing, as it is on page load.
    pub fn shown(message: impl Into<String>) -> Self {
        let spinner = Spinner {
            message: message.into(),
            shown: Mutex::new(false),
        };
        spinner.set_display(Display::Block);
        spinner
    }
}

impl Toggle for Spinner {
    fn set_display(&self, display: Display) {
        let mut shown = self.shown.lock().unwrap_or_else(|e| e.into_inner());
        let mut stderr = io::stderr();
        match display {
            Display::Block if !*shown => {
                let _ = write!(stderr, "  {} {}", "⏳".bold(), self.message.dimmed());
                *shown = true;
            }
            Display::None if *shown => {
                let _ = write!(stderr, "\r\x1b[2K");
                *shown = false;
            }
            _ => {}
        }
        let _ = stderr.flush();
    }
}

/// The generate-report link; only remembers its target.
#[derive(Default)]
pub struct TerminalLink(Mutex<Option<String>>);

impl LinkTarget for TerminalLink {
    fn set_href(&self, href: &str) {
        debug!("generate-report link -> {}", href);
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = Some(href.to_string());
    }
}

/// Following a download link in a terminal means fetching the file and
/// saving it.
pub struct DownloadNavigator {
    transport: Arc<dyn Transport>,
    out_dir: PathBuf,
    saved: Mutex<Option<DownloadedReport>>,
}

impl DownloadNavigator {
    pub fn new(transport: Arc<dyn Transport>, out_dir: PathBuf) -> Self {
        DownloadNavigator {
            transport,
            out_dir,
            saved: Mutex::new(None),
        }
    }

    pub fn saved(&self) -> Option<DownloadedReport> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Navigator for DownloadNavigator {
    async fn navigate(&self, href: &str) -> Result<(), RequestError> {
        let reply = self.transport.get_file(href).await?;
        let saved = download::save(&self.out_dir, href, &reply).await?;
        *self.saved.lock().unwrap_or_else(|e| e.into_inner()) = Some(saved);
        Ok(())
    }
}
