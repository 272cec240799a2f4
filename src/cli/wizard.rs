use anyhow::Result;
use inquire::{Select, Text};
use owo_colors::OwoColorize;

use crate::cli::{ReportArgs, ScanArgs};
use crate::config::ArgusConfig;
use crate::engine::Session;
use crate::report::{self, ReportMode};

// ── Helpers ──────────────────────────────────────────────────────────

/// Print a horizontal separator.
fn separator() {
    println!("{}", "━".repeat(60));
}

// ── Wizard screens ──────────────────────────────────────────────────

/// A) Welcome screen
fn screen_welcome(session: &Session) {
    println!();
    separator();
    println!(
        "  {} {}",
        "🛰".bold(),
        format!("Welcome to Argus v{}", env!("CARGO_PKG_VERSION")).bold()
    );
    println!(
        "  {}",
        "Start API security scans and fetch their reports.".dimmed()
    );
    separator();
    println!();
    println!(
        "  Server: {}",
        session.config().server.base_url.cyan()
    );
    println!(
        "  {} Scans run {} the server; argus only sends the endpoint you enter.",
        "•".bold(),
        "on".bold()
    );
    println!();
}

/// B) Quick-actions menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuickAction {
    RunScan,
    CheckStatus,
    GenerateReport,
    ListScans,
    ShowHelp,
    Exit,
}

impl std::fmt::Display for QuickAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            QuickAction::RunScan => "Scan an API endpoint",
            QuickAction::CheckStatus => "Check a scan's status",
            QuickAction::GenerateReport => "Generate a report",
            QuickAction::ListScans => "List scans",
            QuickAction::ShowHelp => "Show help",
            QuickAction::Exit => "Exit",
        };
        write!(f, "{}", label)
    }
}

fn screen_quick_actions() -> Result<QuickAction> {
    let actions = vec![
        QuickAction::RunScan,
        QuickAction::CheckStatus,
        QuickAction::GenerateReport,
        QuickAction::ListScans,
        QuickAction::ShowHelp,
        QuickAction::Exit,
    ];
    let choice = Select::new("⚡ Quick actions", actions).prompt_skippable()?;
    Ok(choice.unwrap_or(QuickAction::Exit))
}

/// Arguments for a scan started from the wizard. A skipped prompt goes back
/// to the menu; an empty answer is passed on so the scan rejects it with the
/// usual alert.
fn scan_args(endpoint: Option<String>) -> Option<ScanArgs> {
    endpoint.map(|endpoint| ScanArgs {
        endpoint,
        out: None,
        fixed_delay: false,
    })
}

/// C) Endpoint input
async fn screen_scan(session: &Session) -> Result<()> {
    let endpoint = Text::new("API endpoint to scan:")
        .with_placeholder("https://api.example.com/v1")
        .prompt_skippable()?;
    if let Some(args) = scan_args(endpoint) {
        session.scan(&args).await?;
    }
    Ok(())
}

/// D) Status of one scan
async fn screen_status(session: &Session) -> Result<()> {
    if let Some(scan_id) = session.select_scan().await? {
        session.status(&scan_id).await?;
    }
    Ok(())
}

/// E) Report: pick a delivery mode, then a scan.
async fn screen_report(session: &Session) -> Result<()> {
    let default_mode = session.config().report.mode;
    let modes = vec![ReportMode::Render, ReportMode::Redirect];
    let start = modes.iter().position(|m| *m == default_mode).unwrap_or(0);
    let Some(mode) = Select::new("Report delivery:", modes)
        .with_starting_cursor(start)
        .prompt_skippable()?
    else {
        return Ok(());
    };

    let args = ReportArgs {
        scan_id: None,
        mode: Some(mode.to_string()),
        out_dir: None,
        out: None,
    };
    session.report(&args).await?;
    Ok(())
}

// ── Public entry-point ──────────────────────────────────────────────

/// Interactive wizard (no-args mode).
pub async fn run_wizard() -> Result<()> {
    init_quiet_logging();

    let config = ArgusConfig::load(&std::env::current_dir()?).unwrap_or_default();
    let session = Session::with_config(config)?;

    screen_welcome(&session);

    loop {
        match screen_quick_actions()? {
            QuickAction::RunScan => screen_scan(&session).await?,
            QuickAction::CheckStatus => screen_status(&session).await?,
            QuickAction::GenerateReport => screen_report(&session).await?,
            QuickAction::ListScans => match session.scans().await {
                Ok(scans) => report::terminal::render_catalog(&scans),
                Err(e) => println!("  {} {}", "⚠".yellow(), e),
            },
            QuickAction::ShowHelp => {
                use clap::CommandFactory;
                crate::cli::Cli::command().print_help().ok();
                println!();
            }
            QuickAction::Exit => break,
        }
        println!();
    }

    println!("  {}", "Goodbye!".dimmed());
    Ok(())
}

/// Set up minimal tracing for the wizard, which runs before the CLI flags
/// are parsed.
fn init_quiet_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("argus=warn"))
        .with_target(false)
        .without_time()
        .try_init();
}
