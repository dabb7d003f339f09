//! Upcoming-task selection for dashboard lists.
//!
//! Tasks are ranked by completion, then urgency bucket, then due date, and the
//! head of that ordering is returned. Tasks without a usable due date rank
//! last within their completion group and keep their input order.

use crate::types::{Task, UpcomingEntry, UrgencyBucket};
use chrono::{Days, NaiveDate};
use std::cmp::Ordering;

/// Number of tasks shown in the upcoming list when no limit is configured.
pub const DEFAULT_LIMIT: usize = 5;

/// Length of the "this week" window in days, counted after the reference day.
pub const DEFAULT_WEEK_WINDOW_DAYS: u32 = 7;

/// Knobs for upcoming-task selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    pub limit: usize,
    pub week_window_days: u32,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            week_window_days: DEFAULT_WEEK_WINDOW_DAYS,
        }
    }
}

impl SelectionPolicy {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Classify a task's due date relative to `today`.
///
/// Completed tasks and tasks without a valid due date are always `Upcoming`.
pub fn classify(task: &Task, today: NaiveDate, week_window_days: u32) -> UrgencyBucket {
    match task.due_date_obj() {
        Some(due) if !task.completed => bucket_for(due, today, week_window_days),
        _ => UrgencyBucket::Upcoming,
    }
}

fn bucket_for(due: NaiveDate, today: NaiveDate, week_window_days: u32) -> UrgencyBucket {
    let week_end = today
        .checked_add_days(Days::new(u64::from(week_window_days)))
        .unwrap_or(NaiveDate::MAX);
    match due.cmp(&today) {
        Ordering::Less => UrgencyBucket::Overdue,
        Ordering::Equal => UrgencyBucket::Today,
        Ordering::Greater if due <= week_end => UrgencyBucket::ThisWeek,
        Ordering::Greater => UrgencyBucket::Upcoming,
    }
}

/// Sort key for one task. Buckets and dates are computed once per call.
struct Ranked<'a> {
    task: &'a Task,
    bucket: UrgencyBucket,
    due: Option<NaiveDate>,
}

impl Ranked<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        self.task
            .completed
            .cmp(&other.task.completed)
            .then_with(|| self.bucket.cmp(&other.bucket))
            .then_with(|| match (self.due, other.due) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    }
}

/// Rank `tasks` and return the first `policy.limit` entries with their buckets.
pub fn rank_upcoming(
    tasks: &[Task],
    today: NaiveDate,
    policy: &SelectionPolicy,
) -> Vec<UpcomingEntry> {
    if policy.limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<Ranked<'_>> = tasks
        .iter()
        .map(|task| Ranked {
            task,
            bucket: classify(task, today, policy.week_window_days),
            due: task.due_date_obj(),
        })
        .collect();

    // sort_by is stable: fully tied tasks keep input order
    ranked.sort_by(|a, b| a.compare(b));

    ranked
        .into_iter()
        .take(policy.limit)
        .map(|r| UpcomingEntry {
            task: r.task.clone(),
            urgency: r.bucket,
        })
        .collect()
}

/// Select the most urgent tasks using an explicit policy.
pub fn select_upcoming_with(
    tasks: &[Task],
    today: NaiveDate,
    policy: &SelectionPolicy,
) -> Vec<Task> {
    rank_upcoming(tasks, today, policy)
        .into_iter()
        .map(|entry| entry.task)
        .collect()
}

/// Select at most `limit` of the most urgent tasks relative to `today`.
pub fn select_upcoming(tasks: &[Task], today: NaiveDate, limit: usize) -> Vec<Task> {
    select_upcoming_with(tasks, today, &SelectionPolicy::default().with_limit(limit))
}
