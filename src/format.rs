//! Output formatting utilities for markdown and JSON.

use crate::snapshot::DashboardView;
use crate::types::{Priority, ProgressView, UpcomingEntry, UrgencyBucket};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    #[value(alias = "md")]
    Markdown,
}

/// Pretty JSON with a trailing newline.
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

fn bucket_heading(bucket: UrgencyBucket) -> &'static str {
    match bucket {
        UrgencyBucket::Overdue => "Overdue",
        UrgencyBucket::Today => "Due Today",
        UrgencyBucket::ThisWeek => "This Week",
        UrgencyBucket::Upcoming => "Upcoming",
    }
}

/// Format a single entry in short form for lists.
fn format_entry_short(entry: &UpcomingEntry) -> String {
    let task = &entry.task;
    let priority_marker = match task.priority {
        Priority::High => "!!! ",
        Priority::Medium | Priority::Low | Priority::Normal => "",
    };

    let due = match (task.due_date_obj(), task.due_date.as_deref()) {
        (Some(date), _) => format!(" due {}", date),
        (None, Some(raw)) => format!(" due ?{}?", raw),
        (None, None) => " no due date".to_string(),
    };

    let done = if task.completed { " (done)" } else { "" };

    format!("- {}{} `{}`{}{}\n", priority_marker, task.title, task.id, due, done)
}

/// Format the upcoming list as markdown, one section per run of equal buckets.
///
/// Entries are printed in the order given; a bucket heading is emitted each
/// time the bucket changes, so completed tasks get their own section.
pub fn format_upcoming_markdown(entries: &[UpcomingEntry], today: NaiveDate) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Upcoming Tasks ({}) as of {}\n\n", entries.len(), today));

    if entries.is_empty() {
        md.push_str("_Nothing scheduled._\n");
        return md;
    }

    let mut current: Option<(bool, UrgencyBucket)> = None;
    for entry in entries {
        let key = (entry.task.completed, entry.urgency);
        if current != Some(key) {
            if current.is_some() {
                md.push('\n');
            }
            let heading = if entry.task.completed {
                "Completed"
            } else {
                bucket_heading(entry.urgency)
            };
            md.push_str(&format!("## {}\n\n", heading));
            current = Some(key);
        }
        md.push_str(&format_entry_short(entry));
    }

    md
}

/// Format progress numbers as markdown tables.
pub fn format_progress_markdown(view: &ProgressView) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Progress ({} tasks)\n\n", view.total_tasks));
    md.push_str("| Status | Count | Percent |\n|---|---:|---:|\n");
    let rows = [
        ("Completed", view.completed_tasks, view.percentages.completed),
        ("In Progress", view.in_progress_tasks, view.percentages.in_progress),
        ("Not Started", view.not_started_tasks, view.percentages.not_started),
        ("Delayed", view.delayed_tasks, view.percentages.delayed),
    ];
    for (label, count, pct) in rows {
        md.push_str(&format!("| {} | {} | {}% |\n", label, count, pct));
    }

    md.push_str(&format!("\n## Priority ({} tasks)\n\n", view.priority.total));
    md.push_str("| Priority | Count | Percent |\n|---|---:|---:|\n");
    let rows = [
        ("High", view.priority.high, view.priority.percentages.high),
        ("Medium", view.priority.medium, view.priority.percentages.medium),
        ("Low", view.priority.low, view.priority.percentages.low),
    ];
    for (label, count, pct) in rows {
        md.push_str(&format!("| {} | {} | {}% |\n", label, count, pct));
    }

    md
}

/// Format a full dashboard view as markdown.
pub fn format_dashboard_markdown(view: &DashboardView) -> String {
    let mut md = String::new();
    if let Some(ref project) = view.project {
        md.push_str(&format!("# Project: {}\n\n", project));
    }
    md.push_str(&format_upcoming_markdown(&view.upcoming, view.reference_date));
    md.push('\n');
    md.push_str(&format_progress_markdown(&view.progress));
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Task;

    fn entry(task: Task, urgency: UrgencyBucket) -> UpcomingEntry {
        UpcomingEntry { task, urgency }
    }

    #[test]
    fn test_output_format_accepts_md_alias() {
        use clap::ValueEnum;
        assert_eq!(OutputFormat::from_str("md", true), Ok(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("JSON", true), Ok(OutputFormat::Json));
        assert!(OutputFormat::from_str("xml", true).is_err());
    }

    #[test]
    fn test_upcoming_markdown_sections() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let entries = vec![
            entry(
                Task::new("1", "Ship release").with_due("2024-04-01").with_priority(Priority::High),
                UrgencyBucket::Overdue,
            ),
            entry(Task::new("2", "Review").with_due("2024-04-02"), UrgencyBucket::Today),
            entry(Task::new("3", "Someday").with_due("soon"), UrgencyBucket::Upcoming),
            entry(Task::new("4", "Old").completed(true), UrgencyBucket::Upcoming),
        ];

        let md = format_upcoming_markdown(&entries, today);
        assert!(md.starts_with("# Upcoming Tasks (4) as of 2024-04-02"));
        assert!(md.contains("## Overdue\n\n- !!! Ship release `1` due 2024-04-01\n"));
        assert!(md.contains("## Due Today"));
        assert!(md.contains("due ?soon?"));
        assert!(md.contains("## Completed\n\n- Old `4` no due date (done)\n"));
    }

    #[test]
    fn test_empty_upcoming_markdown() {
        let today = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        let md = format_upcoming_markdown(&[], today);
        assert!(md.contains("_Nothing scheduled._"));
    }

    #[test]
    fn test_progress_markdown_rows() {
        let view = ProgressView {
            completed_tasks: 3,
            total_tasks: 10,
            ..Default::default()
        };
        let md = format_progress_markdown(&view);
        assert!(md.contains("# Progress (10 tasks)"));
        assert!(md.contains("| Completed | 3 | 0% |"));
        assert!(md.contains("## Priority (0 tasks)"));
    }
}
