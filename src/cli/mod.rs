//! CLI command definitions for plannavi
//!
//! This module defines the CLI structure using clap's derive macros.
//! The main entry point is the `Cli` struct which contains subcommands.

pub mod progress;
pub mod serve;
pub mod upcoming;
pub mod view;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use progress::ProgressArgs;
use serve::ServeArgs;
use std::path::PathBuf;
use upcoming::UpcomingArgs;
use view::ViewArgs;

/// Plannavi dashboard views and server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (replaces project and user config)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the most urgent tasks from a snapshot
    Upcoming(UpcomingArgs),

    /// Print status and priority breakdowns from a snapshot
    Progress(ProgressArgs),

    /// Print the full dashboard view (upcoming list and progress)
    View(ViewArgs),

    /// Serve the dashboard JSON API over HTTP
    Serve(ServeArgs),
}

/// Parse a `--date` value.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}'. Expected YYYY-MM-DD", s))
}

/// The reference day: the explicit one, or today in local time.
pub fn reference_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
