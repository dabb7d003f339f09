//! Layered configuration.
//!
//! Tiers, lowest to highest priority, merged field-by-field:
//! 1. **Defaults** - built into the binary
//! 2. **Project** - `$CWD/plannavi/config.yaml`
//! 3. **User** - `~/.plannavi/config.yaml`
//! 4. **Environment** - variables below
//!
//! CLI flags are applied by the binary on top of the result.
//!
//! ## Environment Variables
//! - `PLANNAVI_CONFIG_PATH` - Explicit config file (replaces the file tiers)
//! - `PLANNAVI_PROJECT_DIR` - Project config dir (default: `./plannavi`)
//! - `PLANNAVI_USER_DIR` - User config dir (default: `~/.plannavi`)
//! - `PLANNAVI_SNAPSHOT` - Snapshot file served by the dashboard
//! - `PLANNAVI_PORT` - Dashboard port
//! - `PLANNAVI_UPCOMING_LIMIT` - Upcoming list length

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
