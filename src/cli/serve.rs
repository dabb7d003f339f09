//! Serve subcommand for plannavi CLI

use crate::config::Config;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the serve subcommand
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Snapshot file served by `GET /api/dashboard` (overrides config)
    #[arg(short, long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Port to listen on (overrides config, default: 31995)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind (overrides config, default: 127.0.0.1)
    #[arg(long, value_name = "ADDR")]
    pub host: Option<String>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref snapshot) = self.snapshot {
            config.server.snapshot_path = Some(snapshot.clone());
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(ref host) = self.host {
            config.server.host = host.clone();
        }
    }
}
