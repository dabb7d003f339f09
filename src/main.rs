//! Plannavi dashboard CLI
//!
//! Computes the upcoming-task list and progress breakdowns from a project
//! snapshot, either once on the command line or behind an HTTP API.

use anyhow::Result;
use clap::Parser;
use plannavi_dashboard::cli::{Cli, Command};
use plannavi_dashboard::config::{Config, ConfigLoader};
use plannavi_dashboard::dashboard;
use plannavi_dashboard::logging::{self, LogTarget};
use plannavi_dashboard::snapshot::DashboardSnapshot;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;

    let loader = ConfigLoader::load(cli.config.as_deref())?;
    for source in loader.sources() {
        debug!(path = %source.display(), "Using config file");
    }
    let mut config = loader.into_config();

    match cli.command {
        Command::Upcoming(args) => {
            let snapshot = DashboardSnapshot::read_input(&args.input)?;
            print!("{}", args.render(&config, &snapshot)?);
        }
        Command::Progress(args) => {
            let snapshot = DashboardSnapshot::read_input(&args.input)?;
            print!("{}", args.render(&snapshot)?);
        }
        Command::View(args) => {
            let snapshot = DashboardSnapshot::read_input(&args.input)?;
            print!("{}", args.render(&config, &snapshot)?);
        }
        Command::Serve(args) => {
            args.apply(&mut config);
            run_server(config).await?;
        }
    }

    Ok(())
}

/// Run the dashboard API until Ctrl-C.
async fn run_server(config: Config) -> Result<()> {
    match config.server.snapshot_path {
        Some(ref path) => info!(snapshot = %path.display(), "Serving dashboard snapshot"),
        None => info!("No snapshot configured; only POST endpoints will answer"),
    }

    let handle = dashboard::start_server(config).await?;
    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    handle.shutdown().await;

    Ok(())
}
