//! Configuration loader with tier-based merging.
//!
//! Loads configuration from multiple tiers and merges them field-by-field.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// Project-level config ($CWD/plannavi/)
    Project = 1,
    /// User-level config (~/.plannavi/)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories searched for `config.yaml`.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub project_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration directories from environment and defaults.
    pub fn discover() -> Self {
        // User dir: PLANNAVI_USER_DIR or ~/.plannavi
        let user_dir = std::env::var("PLANNAVI_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".plannavi")));

        // Project dir: PLANNAVI_PROJECT_DIR or $CWD/plannavi
        let project_dir = std::env::var("PLANNAVI_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("plannavi")));

        Self {
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }

    fn tier_files(&self) -> Vec<(ConfigTier, PathBuf)> {
        let mut files = Vec::new();
        if let Some(ref dir) = self.project_dir {
            files.push((ConfigTier::Project, dir.join("config.yaml")));
        }
        if let Some(ref dir) = self.user_dir {
            files.push((ConfigTier::User, dir.join("config.yaml")));
        }
        files
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: Config,
    /// Config files that contributed, lowest tier first.
    sources: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Load configuration from all tiers.
    ///
    /// An explicit path (from `--config` or `PLANNAVI_CONFIG_PATH`) replaces
    /// the project and user tiers.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var("PLANNAVI_CONFIG_PATH").ok().map(PathBuf::from);
        let explicit = explicit.map(Path::to_path_buf).or(env_path);
        Self::load_with(ConfigPaths::discover(), explicit.as_deref(), |key| {
            std::env::var(key).ok()
        })
    }

    /// Load configuration with explicit paths and environment lookup.
    pub fn load_with(
        paths: ConfigPaths,
        explicit: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut sources = Vec::new();

        let mut config = if let Some(path) = explicit {
            sources.push(path.to_path_buf());
            Config::load(path)?
        } else {
            debug!(tier = %ConfigTier::Defaults, "Starting from built-in config");
            let mut tiers: Vec<Value> = vec![serde_json::to_value(Config::default())?];

            for (tier, file) in paths.tier_files() {
                if !file.exists() {
                    continue;
                }
                match read_yaml(&file) {
                    Ok(value) => {
                        debug!(tier = %tier, path = %file.display(), "Loaded config tier");
                        tiers.push(value);
                        sources.push(file);
                    }
                    Err(e) => warn!(tier = %tier, "Ignoring config file: {:#}", e),
                }
            }

            serde_json::from_value(deep_merge_all(tiers))
                .context("Merged configuration is invalid")?
        };

        apply_env_overrides(&mut config, env);

        Ok(Self { config, sources })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn into_config(self) -> Config {
        self.config
    }

    /// Config files that were read, lowest tier first.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_yaml::from_str::<Value>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(value)
}

/// Apply environment variable overrides to config. Unparseable values are
/// logged and ignored.
fn apply_env_overrides(config: &mut Config, env: impl Fn(&str) -> Option<String>) {
    let tier = ConfigTier::Environment;

    if let Some(path) = env("PLANNAVI_SNAPSHOT") {
        debug!(tier = %tier, key = "PLANNAVI_SNAPSHOT", "Applied override");
        config.server.snapshot_path = Some(PathBuf::from(path));
    }

    if let Some(port) = env("PLANNAVI_PORT") {
        match port.parse() {
            Ok(port) => {
                debug!(tier = %tier, key = "PLANNAVI_PORT", "Applied override");
                config.server.port = port;
            }
            Err(_) => warn!(tier = %tier, value = %port, "Ignoring invalid PLANNAVI_PORT"),
        }
    }

    if let Some(limit) = env("PLANNAVI_UPCOMING_LIMIT") {
        match limit.parse() {
            Ok(limit) => {
                debug!(tier = %tier, key = "PLANNAVI_UPCOMING_LIMIT", "Applied override");
                config.dashboard.upcoming_limit = limit;
            }
            Err(_) => {
                warn!(tier = %tier, value = %limit, "Ignoring invalid PLANNAVI_UPCOMING_LIMIT")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_PORT;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_tier_order_and_names() {
        assert!(ConfigTier::Defaults < ConfigTier::Project);
        assert!(ConfigTier::User < ConfigTier::Environment);
        assert_eq!(ConfigTier::Defaults.to_string(), "defaults");
        assert_eq!(ConfigTier::Environment.to_string(), "environment");
    }

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with(paths, None, no_env).unwrap();
        let config = loader.config();

        assert_eq!(config.dashboard.upcoming_limit, 5);
        assert_eq!(config.dashboard.this_week_days, 7);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn test_user_config_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("plannavi");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        std::fs::write(
            project_dir.join("config.yaml"),
            "dashboard:\n  upcoming_limit: 10\n  this_week_days: 14\n",
        )
        .unwrap();
        std::fs::write(user_dir.join("config.yaml"), "dashboard:\n  upcoming_limit: 3\n").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(user_dir));
        let loader = ConfigLoader::load_with(paths, None, no_env).unwrap();
        let config = loader.config();

        assert_eq!(config.dashboard.upcoming_limit, 3);
        assert_eq!(config.dashboard.this_week_days, 14);
        assert_eq!(loader.sources().len(), 2);
    }

    #[test]
    fn test_broken_tier_is_skipped() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("plannavi");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("config.yaml"), "dashboard: [unclosed").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), None);
        let loader = ConfigLoader::load_with(paths, None, no_env).unwrap();
        assert_eq!(loader.config().dashboard.upcoming_limit, 5);
    }

    #[test]
    fn test_explicit_path_replaces_tiers() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("plannavi");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("config.yaml"), "server:\n  port: 9000\n").unwrap();

        let explicit = temp.path().join("custom.yaml");
        std::fs::write(&explicit, "server:\n  host: 0.0.0.0\n").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), None);
        let loader = ConfigLoader::load_with(paths, Some(&explicit), no_env).unwrap();

        assert_eq!(loader.config().server.host, "0.0.0.0");
        assert_eq!(loader.config().server.port, DEFAULT_PORT);
    }

    #[test]
    fn test_explicit_path_missing_is_error() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(None, None);
        let missing = temp.path().join("nope.yaml");
        assert!(ConfigLoader::load_with(paths, Some(&missing), no_env).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(Some(temp.path().join("p")), None);
        let env: HashMap<&str, &str> = HashMap::from([
            ("PLANNAVI_SNAPSHOT", "/srv/snapshot.json"),
            ("PLANNAVI_PORT", "not-a-port"),
            ("PLANNAVI_UPCOMING_LIMIT", "12"),
        ]);

        let loader =
            ConfigLoader::load_with(paths, None, |k| env.get(k).map(|v| v.to_string())).unwrap();
        let config = loader.config();

        assert_eq!(
            config.server.snapshot_path,
            Some(PathBuf::from("/srv/snapshot.json"))
        );
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.dashboard.upcoming_limit, 12);
    }
}
