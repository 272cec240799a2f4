use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start a scan of an API endpoint and print the server's answer
    Scan(ScanArgs),

    /// Generate the report of a scan (render it, or download the file)
    Report(ReportArgs),

    /// List scans known to the server
    Scans,

    /// Show the status of one scan, with its results once it has completed
    Status(StatusArgs),

    /// Show the server routes and page elements argus relies on
    Routes,

    /// Initialize an .argus.toml config file in the current directory
    Init,
}

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// API endpoint to scan. An empty value is rejected before anything is sent.
    pub endpoint: String,

    /// Write the JSON answer to a file as well
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Keep the loader up for the configured delay instead of until the
    /// answer arrives
    #[arg(long)]
    pub fixed_delay: bool,
}

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    /// Scan id. Omit to pick from the server's scan list.
    pub scan_id: Option<String>,

    /// Delivery mode: "render" or "redirect" (default from .argus.toml)
    #[arg(short, long)]
    pub mode: Option<String>,

    /// Directory for downloaded report files (redirect mode)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Write the rendered JSON report to a file (render mode)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct StatusArgs {
    /// Scan id, as printed by `argus scan` or `argus scans`
    pub scan_id: String,
}
