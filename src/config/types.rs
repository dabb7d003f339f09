//! Configuration types.

use crate::upcoming::{DEFAULT_LIMIT, DEFAULT_WEEK_WINDOW_DAYS, SelectionPolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default port for the dashboard HTTP server.
pub const DEFAULT_PORT: u16 = 31995;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load configuration from a single YAML file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Snapshot file served by `GET /api/dashboard`.
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Allow cross-origin requests from the web frontend.
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            snapshot_path: None,
            cors: true,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_true() -> bool {
    true
}

/// Upcoming-list settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Maximum number of tasks in the upcoming list.
    #[serde(default = "default_upcoming_limit")]
    pub upcoming_limit: usize,

    /// Days after today that still count as "this week".
    #[serde(default = "default_this_week_days")]
    pub this_week_days: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            upcoming_limit: default_upcoming_limit(),
            this_week_days: default_this_week_days(),
        }
    }
}

fn default_upcoming_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_this_week_days() -> u32 {
    DEFAULT_WEEK_WINDOW_DAYS
}

impl DashboardConfig {
    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy {
            limit: self.upcoming_limit,
            week_window_days: self.this_week_days,
        }
    }
}
