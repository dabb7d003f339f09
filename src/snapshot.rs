//! Versioned dashboard snapshot: the single input schema for tasks and stats.
//!
//! A snapshot is what the project endpoints hand to the dashboard: the task
//! list and, optionally, stats the backend already aggregated.

use crate::progress::aggregate;
use crate::types::{ProgressStats, ProgressView, Task, UpcomingEntry};
use crate::upcoming::{SelectionPolicy, rank_upcoming};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Current snapshot schema version.
pub const CURRENT_SCHEMA_VERSION: u64 = 1;

/// Errors raised while reading or validating a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read snapshot from stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(
        "unsupported snapshot schema version {found} (expected {expected})",
        expected = CURRENT_SCHEMA_VERSION
    )]
    UnsupportedVersion { found: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub schema_version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Entries that are not task objects are skipped with a warning.
    #[serde(default, deserialize_with = "lenient_tasks")]
    pub tasks: Vec<Task>,
    /// Pre-aggregated stats. When absent, stats are tallied from `tasks`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<ProgressStats>,
}

fn lenient_tasks<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Task>, D::Error> {
    let entries = match Value::deserialize(d)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!(found = %other, "Snapshot tasks is not a list; treating as empty");
            return Ok(Vec::new());
        }
    };

    let mut tasks = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            warn!(index, found = %entry, "Skipping snapshot task that is not an object");
            continue;
        }
        match serde_json::from_value::<Task>(entry) {
            Ok(task) => tasks.push(task),
            Err(e) => warn!(index, "Skipping undecodable snapshot task: {}", e),
        }
    }
    Ok(tasks)
}

impl DashboardSnapshot {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            project: None,
            tasks,
            stats: None,
        }
    }

    pub fn with_stats(mut self, stats: ProgressStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Parse and validate a snapshot from JSON text.
    pub fn parse(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: DashboardSnapshot = serde_json::from_str(json)?;
        snapshot.validate()
    }

    /// Validate an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SnapshotError> {
        let snapshot: DashboardSnapshot = serde_json::from_value(value)?;
        snapshot.validate()
    }

    fn validate(self) -> Result<Self, SnapshotError> {
        if self.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.schema_version,
            });
        }
        debug!(
            tasks = self.tasks.len(),
            has_stats = self.stats.is_some(),
            "Snapshot validated"
        );
        Ok(self)
    }

    /// Load a snapshot from a file.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load a snapshot from a path, or from stdin when `input` is `-`.
    pub fn read_input(input: &str) -> Result<Self, SnapshotError> {
        if input == "-" {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(SnapshotError::Stdin)?;
            Self::parse(&content)
        } else {
            Self::load(Path::new(input))
        }
    }

    /// Stats to chart: the supplied ones, or a tally of the task list.
    pub fn progress_stats(&self, today: NaiveDate) -> ProgressStats {
        match &self.stats {
            Some(stats) => stats.clone(),
            None => ProgressStats::from_tasks(&self.tasks, today),
        }
    }

    /// Rank the snapshot's tasks for `today`.
    pub fn upcoming(&self, today: NaiveDate, policy: &SelectionPolicy) -> UpcomingReport {
        UpcomingReport {
            reference_date: today,
            upcoming: rank_upcoming(&self.tasks, today, policy),
        }
    }

    /// Compute both dashboard view-models for `today`.
    pub fn evaluate(&self, today: NaiveDate, policy: &SelectionPolicy) -> DashboardView {
        DashboardView {
            project: self.project.clone(),
            reference_date: today,
            upcoming: rank_upcoming(&self.tasks, today, policy),
            progress: aggregate(&self.progress_stats(today)),
        }
    }
}

/// Upcoming list together with the day it was ranked against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingReport {
    pub reference_date: NaiveDate,
    pub upcoming: Vec<UpcomingEntry>,
}

/// Everything a dashboard page renders from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    pub reference_date: NaiveDate,
    pub upcoming: Vec<UpcomingEntry>,
    pub progress: ProgressView,
}
