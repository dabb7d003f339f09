//! Progress aggregation for dashboard charts.

use crate::types::{
    Priority, PriorityCounts, PriorityPercentages, PriorityView, ProgressStats, ProgressView,
    StatusPercentages, Task, TaskStatus,
};
use chrono::NaiveDate;

/// `count / total * 100`, rounded half-up, clamped to 100. Zero when `total` is 0.
pub fn percentage(count: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let (count, total) = (u128::from(count), u128::from(total));
    let rounded = (count * 200 + total) / (total * 2);
    rounded.min(100) as u8
}

/// Build the chart view from (possibly partial) stats.
///
/// The status and priority percentages use separate denominators and are
/// not reconciled with each other.
pub fn aggregate(stats: &ProgressStats) -> ProgressView {
    let total = match stats.total_tasks {
        Some(total) if total > 0 => total,
        _ => stats.status_sum(),
    };

    ProgressView {
        completed_tasks: stats.completed_tasks,
        in_progress_tasks: stats.in_progress_tasks,
        not_started_tasks: stats.not_started_tasks,
        delayed_tasks: stats.delayed_tasks,
        total_tasks: total,
        percentages: StatusPercentages {
            completed: percentage(stats.completed_tasks, total),
            in_progress: percentage(stats.in_progress_tasks, total),
            not_started: percentage(stats.not_started_tasks, total),
            delayed: percentage(stats.delayed_tasks, total),
        },
        priority: priority_view(&stats.tasks_by_priority),
    }
}

fn priority_view(counts: &PriorityCounts) -> PriorityView {
    let total = counts.total();
    PriorityView {
        high: counts.high,
        medium: counts.medium,
        low: counts.low,
        total,
        percentages: PriorityPercentages {
            high: percentage(counts.high, total),
            medium: percentage(counts.medium, total),
            low: percentage(counts.low, total),
        },
    }
}

impl ProgressStats {
    /// Tally stats from a task collection.
    ///
    /// Tasks without an explicit in-progress or delayed status are counted as
    /// delayed once their due date is before `today`. Tasks with normal
    /// priority are left out of the priority breakdown. `total_tasks` is left
    /// unset so it derives from the status counts.
    pub fn from_tasks(tasks: &[Task], today: NaiveDate) -> Self {
        let mut stats = ProgressStats::default();

        for task in tasks {
            let overdue = task.due_date_obj().is_some_and(|due| due < today);
            match (&task.status, task.is_done()) {
                (_, true) => stats.completed_tasks += 1,
                (Some(TaskStatus::InProgress), _) => stats.in_progress_tasks += 1,
                (Some(TaskStatus::Delayed), _) => stats.delayed_tasks += 1,
                _ if overdue => stats.delayed_tasks += 1,
                _ => stats.not_started_tasks += 1,
            }

            match task.priority {
                Priority::High => stats.tasks_by_priority.high += 1,
                Priority::Medium => stats.tasks_by_priority.medium += 1,
                Priority::Low => stats.tasks_by_priority.low += 1,
                Priority::Normal => {}
            }
        }

        stats
    }
}
