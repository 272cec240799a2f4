pub mod commands;
pub mod wizard;

use clap::Parser;

pub use commands::{Commands, ReportArgs, ScanArgs, StatusArgs};

/// Argus: client for the Argus API scanner
///
/// Starts scans of API endpoints and fetches their reports.
#[derive(Parser, Debug)]
#[command(
    name = "argus",
    version,
    about = "🛰  Argus: trigger API security scans and fetch their reports",
    long_about = "Argus talks to an Argus scanner server.\nIt starts scans of API endpoints, lists past scans, shows their status, and renders or downloads their reports."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Root URL of the Argus server (overrides .argus.toml)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Ignore .argus.toml config files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Enable verbose output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
