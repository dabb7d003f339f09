//! View subcommand: the whole dashboard for one snapshot.

use super::reference_date;
use crate::config::Config;
use crate::format::{OutputFormat, format_dashboard_markdown, render_json};
use crate::snapshot::DashboardSnapshot;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

/// Arguments for the view subcommand
#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Snapshot file, or `-` for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Maximum number of upcoming tasks (default: from config)
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Reference day as YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE", value_parser = super::parse_date)]
    pub date: Option<NaiveDate>,

    /// Output format: json (default) or markdown
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl ViewArgs {
    pub fn render(&self, config: &Config, snapshot: &DashboardSnapshot) -> Result<String> {
        let today = reference_date(self.date);
        let mut policy = config.dashboard.selection_policy();
        if let Some(limit) = self.limit {
            policy = policy.with_limit(limit);
        }

        let view = snapshot.evaluate(today, &policy);
        match self.format {
            OutputFormat::Json => render_json(&view),
            OutputFormat::Markdown => Ok(format_dashboard_markdown(&view)),
        }
    }
}
