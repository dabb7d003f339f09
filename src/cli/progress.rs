//! Progress subcommand for plannavi CLI

use super::reference_date;
use crate::format::{OutputFormat, format_progress_markdown, render_json};
use crate::progress::aggregate;
use crate::snapshot::DashboardSnapshot;
use crate::types::ProgressStats;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

/// Arguments for the progress subcommand
#[derive(Args, Debug)]
pub struct ProgressArgs {
    /// Snapshot file, or `-` for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Tally stats from the task list even when the snapshot carries stats
    #[arg(long)]
    pub from_tasks: bool,

    /// Reference day for overdue detection as YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE", value_parser = super::parse_date)]
    pub date: Option<NaiveDate>,

    /// Output format: json (default) or markdown
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl ProgressArgs {
    /// Render the progress view for `snapshot`.
    pub fn render(&self, snapshot: &DashboardSnapshot) -> Result<String> {
        let today = reference_date(self.date);
        let stats = if self.from_tasks {
            ProgressStats::from_tasks(&snapshot.tasks, today)
        } else {
            snapshot.progress_stats(today)
        };

        let view = aggregate(&stats);
        match self.format {
            OutputFormat::Json => render_json(&view),
            OutputFormat::Markdown => Ok(format_progress_markdown(&view)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot::from_value(json!({
            "schemaVersion": 1,
            "tasks": [
                { "id": 1, "completed": true },
                { "id": 2, "status": "in_progress" }
            ],
            "stats": { "completedTasks": 10, "notStartedTasks": 10 }
        }))
        .unwrap()
    }

    fn args(from_tasks: bool) -> ProgressArgs {
        ProgressArgs {
            input: "-".to_string(),
            from_tasks,
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            format: OutputFormat::Json,
        }
    }

    #[test]
    fn test_supplied_stats_by_default() {
        let out = args(false).render(&snapshot()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["totalTasks"], 20);
        assert_eq!(value["percentages"]["completed"], 50);
    }

    #[test]
    fn test_from_tasks_ignores_supplied_stats() {
        let out = args(true).render(&snapshot()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["totalTasks"], 2);
        assert_eq!(value["inProgressTasks"], 1);
    }
}
