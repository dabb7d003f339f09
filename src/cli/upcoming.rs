//! Upcoming subcommand for plannavi CLI
//!
//! Ranks a snapshot's tasks by urgency and prints the head of the list.

use super::reference_date;
use crate::config::Config;
use crate::format::{OutputFormat, format_upcoming_markdown, render_json};
use crate::snapshot::DashboardSnapshot;
use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;

/// Arguments for the upcoming subcommand
#[derive(Args, Debug)]
pub struct UpcomingArgs {
    /// Snapshot file, or `-` for stdin
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Maximum number of tasks to print (default: from config)
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Reference day as YYYY-MM-DD (default: today)
    #[arg(long, value_name = "DATE", value_parser = super::parse_date)]
    pub date: Option<NaiveDate>,

    /// Output format: json (default) or markdown
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl UpcomingArgs {
    /// Render the upcoming list for `snapshot`.
    pub fn render(&self, config: &Config, snapshot: &DashboardSnapshot) -> Result<String> {
        let today = reference_date(self.date);
        let mut policy = config.dashboard.selection_policy();
        if let Some(limit) = self.limit {
            policy = policy.with_limit(limit);
        }

        let report = snapshot.upcoming(today, &policy);
        match self.format {
            OutputFormat::Json => render_json(&report),
            OutputFormat::Markdown => Ok(format_upcoming_markdown(&report.upcoming, today)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn args(limit: Option<usize>, format: OutputFormat) -> UpcomingArgs {
        UpcomingArgs {
            input: "-".to_string(),
            limit,
            date: NaiveDate::from_ymd_opt(2024, 1, 15),
            format,
        }
    }

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot::from_value(json!({
            "schemaVersion": 1,
            "tasks": [
                { "id": "a", "title": "Later", "dueDate": "2024-03-01" },
                { "id": "b", "title": "Late", "dueDate": "2024-01-10" },
                { "id": "c", "title": "Now", "dueDate": "2024-01-15" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_render_json_honors_limit() {
        let out = args(Some(2), OutputFormat::Json)
            .render(&Config::default(), &snapshot())
            .unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["referenceDate"], "2024-01-15");
        let ids: Vec<&str> = value["upcoming"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(value["upcoming"][0]["urgency"], "overdue");
    }

    #[test]
    fn test_render_uses_config_limit() {
        let mut config = Config::default();
        config.dashboard.upcoming_limit = 1;
        let out = args(None, OutputFormat::Markdown)
            .render(&config, &snapshot())
            .unwrap();

        assert!(out.contains("Late"));
        assert!(!out.contains("Later"));
        assert!(!out.contains("Now"));
    }
}
