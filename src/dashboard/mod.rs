//! Dashboard HTTP server module.
//!
//! Serves the upcoming-task list and progress view-models as JSON for the
//! web frontend. Started by the `serve` subcommand.

mod server;

pub use server::{
    DashboardHandle, DashboardServer, ViewQuery, api_dashboard, api_progress,
    api_upcoming, build_router, start_server,
};
