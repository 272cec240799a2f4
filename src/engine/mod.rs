use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use owo_colors::OwoColorize;
use tracing::{debug, info, warn};

use crate::cli::{Cli, ReportArgs, ScanArgs};
use crate::config::ArgusConfig;
use crate::error::TriggerResult;
use crate::loader::{self, LoaderTimer, Reveal};
use crate::page::terminal::{DownloadNavigator, Field, Panel, Spinner, TerminalAlert, TerminalLink};
use crate::page::{Alerter, Toggle};
use crate::report::catalog::{ScanCatalog, ScanSummary};
use crate::report::{self, ReportAction, ReportMode, ReportOutcome, ReportRequester};
use crate::scan::ScanTrigger;
use crate::transport::{HttpTransport, Transport};

/// One CLI invocation: resolved configuration plus a transport to the
/// server. Each command binds a fresh set of terminal elements.
pub struct Session {
    config: ArgusConfig,
    transport: Arc<dyn Transport>,
}

impl Session {
    pub fn new(cli: &Cli) -> Result<Self> {
        let mut config = if cli.no_config {
            ArgusConfig::default()
        } else {
            ArgusConfig::load(&std::env::current_dir()?).unwrap_or_default()
        };

        if let Some(ref server) = cli.server {
            config.server.base_url = server.clone();
        }
        if let Some(secs) = cli.timeout {
            config.server.timeout_secs = Some(secs);
        }

        Self::with_config(config)
    }

    pub fn with_config(config: ArgusConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config.server)?;
        info!("Server: {}", config.server.base_url);
        Ok(Session::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: ArgusConfig, transport: Arc<dyn Transport>) -> Self {
        Session { config, transport }
    }

    pub fn config(&self) -> &ArgusConfig {
        &self.config
    }

    /// Run a scan with the loader showing until the answer is in.
    /// Returns false when the action ended in an alert or error text.
    pub async fn scan(&self, args: &ScanArgs) -> Result<bool> {
        let panel = Arc::new(Panel::hidden(self.transport.clone()));
        let spinner = Arc::new(Spinner::shown(format!("Scanning {} ...", args.endpoint)));
        self.run_scan(args, panel, spinner).await
    }

    /// Scan with the given content panel and loader element. The panel
    /// holds the answer back until the loader gives way to it.
    pub async fn run_scan(
        &self,
        args: &ScanArgs,
        panel: Arc<Panel>,
        loader: Arc<dyn Toggle>,
    ) -> Result<bool> {
        let timer = LoaderTimer::new(Some(loader), Some(panel.clone() as Arc<dyn Toggle>));

        let trigger = ScanTrigger::new(
            Arc::new(Field::new(args.endpoint.clone())),
            panel,
            Arc::new(TerminalAlert),
            self.transport.clone(),
        );

        let outcome = if args.fixed_delay {
            let delay = Duration::from_millis(self.config.loader.delay_ms);
            let loading = timer.on_page_load(Reveal::Delay(delay));
            let outcome = trigger.click().await;
            let state = loading.await?;
            debug!("Loader {:?}", state);
            outcome
        } else {
            let (signal, reveal) = loader::readiness();
            let (outcome, _) = tokio::join!(
                async {
                    let outcome = trigger.click().await;
                    signal.ready();
                    outcome
                },
                timer.run(reveal)
            );
            outcome
        };

        if let (Some(path), Ok(body)) = (&args.out, &outcome) {
            std::fs::write(path, report::json::render(body)?)?;
            info!("Scan response written to {}", path.display());
        }

        Ok(finished(outcome))
    }

    /// Generate/fetch the report of one scan.
    pub async fn report(&self, args: &ReportArgs) -> Result<bool> {
        let mode = match args.mode {
            Some(ref m) => m.parse::<ReportMode>()?,
            None => self.config.report.mode,
        };

        let scan_id = match args.scan_id {
            Some(ref id) => id.clone(),
            None => match self.select_scan().await? {
                Some(id) => id,
                None => {
                    warn!("No scan selected");
                    String::new()
                }
            },
        };

        let out_dir = args
            .out_dir
            .clone()
            .unwrap_or_else(|| self.config.report.download_dir.clone());

        let outcome = self.request_report(&scan_id, mode, out_dir).await;

        if let (Some(path), Ok(ReportOutcome::Rendered(view))) = (&args.out, &outcome) {
            std::fs::write(path, &view.preformatted)?;
            info!("Report written to {}", path.display());
        }

        Ok(finished(outcome))
    }

    pub async fn request_report(
        &self,
        scan_id: &str,
        mode: ReportMode,
        out_dir: PathBuf,
    ) -> TriggerResult<ReportOutcome> {
        let navigator = Arc::new(DownloadNavigator::new(self.transport.clone(), out_dir));
        let action = match mode {
            ReportMode::Redirect => ReportAction::Redirect {
                link: Arc::new(TerminalLink::default()),
                navigator: navigator.clone(),
            },
            ReportMode::Render => ReportAction::Render {
                transport: self.transport.clone(),
                output: Arc::new(Panel::visible(self.transport.clone())),
            },
        };

        let requester = ReportRequester::new(
            Arc::new(Field::new(scan_id)),
            Arc::new(TerminalAlert),
            action,
        );
        debug!("Report mode: {}", requester.mode());
        let outcome = requester.submit().await;

        if let Some(saved) = navigator.saved() {
            println!(
                "  {} Report written to {} ({} bytes, SHA256 {})",
                "✅".bold(),
                saved.path.display().to_string().green(),
                saved.bytes,
                saved.sha256.dimmed()
            );
        }
        outcome
    }

    fn catalog(&self) -> ScanCatalog {
        ScanCatalog::new(self.transport.clone(), &self.config.server)
    }

    /// Scans known to the server.
    pub async fn scans(&self) -> Result<Vec<ScanSummary>> {
        Ok(self.catalog().fetch().await?)
    }

    /// Print the status of one scan, with its results once completed.
    pub async fn status(&self, scan_id: &str) -> Result<bool> {
        let outcome = self.catalog().status(scan_id).await;
        match &outcome {
            Ok(detail) => println!("{}", report::terminal::format_status(detail)?),
            Err(e) => TerminalAlert.alert(&e.to_string()),
        }
        Ok(finished(outcome))
    }

    /// Fill the scan selector from the server and let the user pick.
    /// `None` when the user skipped the prompt.
    pub async fn select_scan(&self) -> Result<Option<String>> {
        let scans = match self.scans().await {
            Ok(scans) => scans,
            Err(e) => {
                warn!("Could not list scans: {}", e);
                Vec::new()
            }
        };

        if scans.is_empty() {
            return Ok(inquire::Text::new("Scan id:").prompt_skippable()?);
        }

        let choice = inquire::Select::new("Select a scan:", scans).prompt_skippable()?;
        Ok(choice.map(|s| s.scan_id))
    }
}

/// Whether a user action went through. Failures were already shown and
/// logged where they happened.
fn finished<T>(outcome: TriggerResult<T>) -> bool {
    match outcome {
        Ok(_) => true,
        Err(e) => {
            debug!(validation = e.is_validation(), "Action ended early: {}", e);
            false
        }
    }
}
