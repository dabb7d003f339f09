//! Core view-model types for dashboard task prioritization and progress charts.
//!
//! Everything here is transient: built from API payloads on every fetch and
//! never persisted.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Task priority as reported by the task endpoints.
///
/// Absent or unrecognised values are treated as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Priority {
    High,
    Medium,
    Low,
    #[default]
    Normal,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Normal => "normal",
        }
    }

    /// Parse a priority string. Returns `Normal` for unrecognized values.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Normal,
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Priority::parse(&s),
            _ => Priority::Normal,
        })
    }
}

/// Workflow status of a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    Delayed,
    /// A status string outside the known set, kept verbatim.
    Other(String),
}

impl TaskStatus {
    /// Parse a status string. Separators and case are ignored, so
    /// `in_progress`, `inProgress` and `In Progress` are all the same status.
    pub fn parse(s: &str) -> Self {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "notstarted" => TaskStatus::NotStarted,
            "inprogress" => TaskStatus::InProgress,
            "completed" => TaskStatus::Completed,
            "delayed" | "overdue" => TaskStatus::Delayed,
            _ => TaskStatus::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Delayed => "delayed",
            TaskStatus::Other(s) => s,
        }
    }
}

impl Serialize for TaskStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => TaskStatus::parse(&s),
            other => TaskStatus::Other(other.to_string()),
        })
    }
}

/// A task as consumed by the dashboard views.
///
/// Dates are kept as the raw strings the API sent; they are parsed on demand
/// so that an unparseable value never rejects the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTask")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Task as it arrives on the wire. Document stores send `_id` and
/// `endDate`, often next to `id` and `dueDate`; the latter win.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTask {
    #[serde(default, deserialize_with = "de::opaque_id")]
    id: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "de::opaque_id")]
    document_id: Option<String>,
    #[serde(default, deserialize_with = "de::text")]
    title: String,
    #[serde(default, deserialize_with = "de::raw_date")]
    due_date: Option<String>,
    #[serde(default, deserialize_with = "de::raw_date")]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "de::raw_date")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "de::flag")]
    completed: bool,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    status: Option<TaskStatus>,
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        Self {
            id: raw.id.or(raw.document_id).unwrap_or_default(),
            title: raw.title,
            due_date: raw.due_date.or(raw.end_date),
            start_date: raw.start_date,
            completed: raw.completed,
            priority: raw.priority,
            status: raw.status,
        }
    }
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: None,
            start_date: None,
            completed: false,
            priority: Priority::Normal,
            status: None,
        }
    }

    pub fn with_due(mut self, due: impl Into<String>) -> Self {
        self.due_date = Some(due.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Due date truncated to the calendar day, or `None` if missing or invalid.
    pub fn due_date_obj(&self) -> Option<NaiveDate> {
        self.due_date.as_deref().and_then(parse_calendar_date)
    }

    /// Done either by flag or by status.
    pub fn is_done(&self) -> bool {
        self.completed || self.status == Some(TaskStatus::Completed)
    }
}

/// Parse a date as sent by the task endpoints and truncate it to midnight.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (converted to local time first)
/// and naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamps.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    None
}

/// Urgency of a task's due date relative to a reference day.
///
/// Declaration order is sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UrgencyBucket {
    Overdue,
    Today,
    ThisWeek,
    Upcoming,
}

impl UrgencyBucket {
    pub fn rank(&self) -> u8 {
        match self {
            UrgencyBucket::Overdue => 0,
            UrgencyBucket::Today => 1,
            UrgencyBucket::ThisWeek => 2,
            UrgencyBucket::Upcoming => 3,
        }
    }
}

/// A selected task paired with the bucket it was ranked under.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingEntry {
    #[serde(flatten)]
    pub task: Task,
    pub urgency: UrgencyBucket,
}

/// Task counts per priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityCounts {
    #[serde(deserialize_with = "de::count")]
    pub high: u64,
    #[serde(deserialize_with = "de::count")]
    pub medium: u64,
    #[serde(deserialize_with = "de::count")]
    pub low: u64,
}

impl PriorityCounts {
    /// Saturates instead of overflowing on absurd counts.
    pub fn total(&self) -> u64 {
        self.high.saturating_add(self.medium).saturating_add(self.low)
    }
}

/// Aggregate status and priority counts over a task population.
///
/// Every field is optional on the wire; missing or malformed counts read as 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressStats {
    #[serde(deserialize_with = "de::count")]
    pub completed_tasks: u64,
    #[serde(deserialize_with = "de::count")]
    pub in_progress_tasks: u64,
    #[serde(deserialize_with = "de::count")]
    pub not_started_tasks: u64,
    #[serde(alias = "overdueCount", deserialize_with = "de::count")]
    pub delayed_tasks: u64,
    /// Authoritative when present and non-zero, even if it disagrees with the
    /// status counts.
    #[serde(
        deserialize_with = "de::optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_tasks: Option<u64>,
    #[serde(deserialize_with = "de::or_default")]
    pub tasks_by_priority: PriorityCounts,
}

impl ProgressStats {
    pub fn status_sum(&self) -> u64 {
        [
            self.in_progress_tasks,
            self.not_started_tasks,
            self.delayed_tasks,
        ]
        .into_iter()
        .fold(self.completed_tasks, u64::saturating_add)
    }
}

/// Percentages per status, each rounded independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPercentages {
    pub completed: u8,
    pub in_progress: u8,
    pub not_started: u8,
    pub delayed: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityPercentages {
    pub high: u8,
    pub medium: u8,
    pub low: u8,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityView {
    pub high: u64,
    pub medium: u64,
    pub low: u64,
    pub total: u64,
    pub percentages: PriorityPercentages,
}

/// Chart-ready progress numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressView {
    pub completed_tasks: u64,
    pub in_progress_tasks: u64,
    pub not_started_tasks: u64,
    pub delayed_tasks: u64,
    pub total_tasks: u64,
    pub percentages: StatusPercentages,
    pub priority: PriorityView,
}

/// Lenient field decoders. API payloads are loosely typed; a bad field
/// degrades to a default instead of rejecting the record.
mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn opaque_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    pub fn raw_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
            Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
            _ => false,
        })
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(coerce_count(&Value::deserialize(d)?).unwrap_or(0))
    }

    pub fn optional_count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(coerce_count(&Value::deserialize(d)?))
    }

    pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
    }

    /// Negative values clamp to 0, fractions floor, numeric strings parse.
    /// Null and non-numeric values yield `None`.
    fn coerce_count(value: &Value) -> Option<u64> {
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_u64() {
                    Some(v)
                } else if n.as_i64().is_some() {
                    Some(0)
                } else {
                    n.as_f64().map(from_float)
                }
            }
            Value::String(s) => s.trim().parse::<f64>().ok().map(from_float),
            _ => None,
        }
    }

    fn from_float(v: f64) -> u64 {
        if v.is_finite() && v > 0.0 {
            v.floor() as u64
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_accepts_aliases() {
        let task: Task = serde_json::from_value(json!({
            "_id": "64f0c1",
            "title": "Draft plan",
            "endDate": "2024-03-10",
            "completed": false,
            "priority": "HIGH",
            "status": "inProgress"
        }))
        .unwrap();

        assert_eq!(task.id, "64f0c1");
        assert_eq!(task.due_date_obj(), NaiveDate::from_ymd_opt(2024, 3, 10));
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.status, Some(TaskStatus::InProgress));
    }

    #[test]
    fn test_task_with_both_key_spellings() {
        let task: Task = serde_json::from_value(json!({
            "_id": "64f0c1",
            "id": "task-1",
            "dueDate": "2024-03-10",
            "endDate": "2024-04-01"
        }))
        .unwrap();
        assert_eq!(task.id, "task-1");
        assert_eq!(task.due_date.as_deref(), Some("2024-03-10"));

        let task: Task = serde_json::from_value(json!({
            "_id": 42,
            "id": null,
            "dueDate": null,
            "endDate": "2024-04-01"
        }))
        .unwrap();
        assert_eq!(task.id, "42");
        assert_eq!(task.due_date.as_deref(), Some("2024-04-01"));
    }

    #[test]
    fn test_task_serializes_canonical_keys() {
        let task: Task =
            serde_json::from_value(json!({ "_id": "a", "endDate": "2024-03-10" })).unwrap();
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["id"], "a");
        assert_eq!(value["dueDate"], "2024-03-10");
        assert!(value.get("_id").is_none());
        assert!(value.get("endDate").is_none());
    }

    #[test]
    fn test_sums_saturate() {
        let stats = ProgressStats {
            completed_tasks: u64::MAX,
            in_progress_tasks: 1,
            delayed_tasks: u64::MAX,
            tasks_by_priority: PriorityCounts {
                high: u64::MAX,
                medium: 5,
                low: 1,
            },
            ..Default::default()
        };
        assert_eq!(stats.status_sum(), u64::MAX);
        assert_eq!(stats.tasks_by_priority.total(), u64::MAX);
    }

    #[test]
    fn test_task_numeric_id_and_missing_fields() {
        let task: Task = serde_json::from_value(json!({ "id": 7 })).unwrap();
        assert_eq!(task.id, "7");
        assert_eq!(task.title, "");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Normal);
        assert!(task.due_date.is_none());
        assert!(task.status.is_none());
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let task: Task = serde_json::from_value(json!({
            "id": "a",
            "title": null,
            "dueDate": 12,
            "completed": null,
            "priority": 3,
            "status": "archived"
        }))
        .unwrap();

        assert_eq!(task.due_date.as_deref(), Some("12"));
        assert_eq!(task.due_date_obj(), None);
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Normal);
        assert_eq!(task.status, Some(TaskStatus::Other("archived".to_string())));
    }

    #[test]
    fn test_parse_calendar_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(parse_calendar_date("2024-05-01"), expected);
        assert_eq!(parse_calendar_date(" 2024-05-01 "), expected);
        assert_eq!(parse_calendar_date("2024-05-01T18:30:00"), expected);
        assert_eq!(parse_calendar_date("2024-05-01T18:30:00.250"), expected);
        assert!(parse_calendar_date("2024-05-01T12:00:00Z").is_some());
        assert_eq!(parse_calendar_date("not a date"), None);
        assert_eq!(parse_calendar_date("2024-02-30"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_status_parse_normalizes() {
        assert_eq!(TaskStatus::parse("not_started"), TaskStatus::NotStarted);
        assert_eq!(TaskStatus::parse("In Progress"), TaskStatus::InProgress);
        assert_eq!(TaskStatus::parse("overdue"), TaskStatus::Delayed);
        assert_eq!(TaskStatus::parse("COMPLETED"), TaskStatus::Completed);
    }

    #[test]
    fn test_stats_lenient_counts() {
        let stats: ProgressStats = serde_json::from_value(json!({
            "completedTasks": "4",
            "inProgressTasks": -2,
            "notStartedTasks": 2.7,
            "overdueCount": 1,
            "totalTasks": null,
            "tasksByPriority": { "high": 1, "low": "x" }
        }))
        .unwrap();

        assert_eq!(stats.completed_tasks, 4);
        assert_eq!(stats.in_progress_tasks, 0);
        assert_eq!(stats.not_started_tasks, 2);
        assert_eq!(stats.delayed_tasks, 1);
        assert_eq!(stats.total_tasks, None);
        assert_eq!(
            stats.tasks_by_priority,
            PriorityCounts { high: 1, medium: 0, low: 0 }
        );
    }

    #[test]
    fn test_stats_empty_object() {
        let stats: ProgressStats = serde_json::from_value(json!({})).unwrap();
        assert_eq!(stats, ProgressStats::default());

        let stats: ProgressStats =
            serde_json::from_value(json!({ "tasksByPriority": null })).unwrap();
        assert_eq!(stats.tasks_by_priority, PriorityCounts::default());
    }

    #[test]
    fn test_bucket_order_matches_rank() {
        let mut buckets = vec![
            UrgencyBucket::Upcoming,
            UrgencyBucket::Today,
            UrgencyBucket::Overdue,
            UrgencyBucket::ThisWeek,
        ];
        buckets.sort();
        let ranks: Vec<u8> = buckets.iter().map(|b| b.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert_eq!(
            serde_json::to_value(UrgencyBucket::ThisWeek).unwrap(),
            json!("thisWeek")
        );
    }
}
