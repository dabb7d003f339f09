//! Plannavi dashboard library
//!
//! View-model computation for the project dashboard: urgency-ranked upcoming
//! tasks and status/priority progress percentages, plus the snapshot format,
//! configuration and HTTP API built around them.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod logging;
pub mod progress;
pub mod snapshot;
pub mod types;
pub mod upcoming;
