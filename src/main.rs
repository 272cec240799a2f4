mod cli;
mod config;
mod engine;
mod error;
mod loader;
mod page;
mod report;
mod routes;
mod scan;
mod transport;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use engine::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // No arguments at all → interactive wizard
    if std::env::args().len() == 1 {
        return cli::wizard::run_wizard().await;
    }

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("argus=debug")
    } else if cli.quiet {
        EnvFilter::new("argus=error")
    } else {
        EnvFilter::new("argus=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    info!("Argus v{}", env!("CARGO_PKG_VERSION"));

    let ok = match &cli.command {
        cli::Commands::Scan(args) => Session::new(&cli)?.scan(args).await?,
        cli::Commands::Report(args) => Session::new(&cli)?.report(args).await?,
        cli::Commands::Scans => {
            let scans = Session::new(&cli)?.scans().await?;
            report::terminal::render_catalog(&scans);
            true
        }
        cli::Commands::Status(args) => Session::new(&cli)?.status(&args.scan_id).await?,
        cli::Commands::Routes => {
            let session = Session::new(&cli)?;
            routes::list_routes(&session.config().server);
            true
        }
        cli::Commands::Init => {
            config::init_config()?;
            true
        }
    };

    // Exit code 1 when the action ended in an alert or error
    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
