//! HTTP server implementation for the dashboard view-models.
//!
//! This module provides the axum-based HTTP server that computes upcoming
//! lists and progress charts and returns them as JSON. It never writes data:
//! `GET /api/dashboard` re-reads the configured snapshot file on every request.

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{DashboardError, DashboardResult};
use crate::progress::aggregate;
use crate::snapshot::{DashboardSnapshot, DashboardView, SnapshotError, UpcomingReport};
use crate::types::ProgressView;
use crate::upcoming::SelectionPolicy;

/// Dashboard server state shared across handlers.
#[derive(Clone)]
pub struct DashboardServer {
    config: Arc<Config>,
}

impl DashboardServer {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn snapshot_path(&self) -> Option<&Path> {
        self.config.server.snapshot_path.as_deref()
    }

    /// Selection policy for a request, honoring a `limit` override.
    fn policy(&self, query: &ViewQuery) -> SelectionPolicy {
        let policy = self.config.dashboard.selection_policy();
        match query.limit {
            Some(limit) => policy.with_limit(limit),
            None => policy,
        }
    }
}

/// Query parameters accepted by the view endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// Reference day as `YYYY-MM-DD`; defaults to today in local time.
    pub date: Option<String>,
    /// Upcoming list length; defaults to the configured limit.
    pub limit: Option<usize>,
}

impl ViewQuery {
    fn reference_date(&self) -> DashboardResult<NaiveDate> {
        match self.date.as_deref() {
            None => Ok(Local::now().date_naive()),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| DashboardError::invalid_value("date", "Expected a YYYY-MM-DD date")),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn api_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "plannavi-dashboard",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /api/health",
            "GET /api/dashboard?date=&limit=",
            "POST /api/upcoming?date=&limit=",
            "POST /api/progress?date="
        ]
    }))
}

async fn read_snapshot(path: &Path) -> Result<DashboardSnapshot, SnapshotError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    DashboardSnapshot::parse(&content)
}

/// Full dashboard view from the configured snapshot file.
pub async fn api_dashboard(
    State(state): State<DashboardServer>,
    Query(query): Query<ViewQuery>,
) -> DashboardResult<Json<DashboardView>> {
    let path = state
        .snapshot_path()
        .ok_or_else(DashboardError::snapshot_not_configured)?;
    let today = query.reference_date()?;
    let snapshot = read_snapshot(path).await?;

    let view = snapshot.evaluate(today, &state.policy(&query));
    debug!(
        tasks = snapshot.tasks.len(),
        upcoming = view.upcoming.len(),
        "Served dashboard view"
    );
    Ok(Json(view))
}

/// Upcoming list for a snapshot posted in the request body.
pub async fn api_upcoming(
    State(state): State<DashboardServer>,
    Query(query): Query<ViewQuery>,
    body: String,
) -> DashboardResult<Json<UpcomingReport>> {
    let today = query.reference_date()?;
    let snapshot = DashboardSnapshot::parse(&body)?;
    Ok(Json(snapshot.upcoming(today, &state.policy(&query))))
}

/// Progress view for a snapshot posted in the request body.
pub async fn api_progress(
    Query(query): Query<ViewQuery>,
    body: String,
) -> DashboardResult<Json<ProgressView>> {
    let today = query.reference_date()?;
    let snapshot = DashboardSnapshot::parse(&body)?;
    Ok(Json(aggregate(&snapshot.progress_stats(today))))
}

/// Build the router with all routes.
pub fn build_router(state: DashboardServer) -> Router {
    let cors_enabled = state.config().server.cors;

    let router = Router::new()
        .route("/api", get(api_root))
        .route("/api/health", get(health))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/upcoming", post(api_upcoming))
        .route("/api/progress", post(api_progress))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_enabled {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Handle for a running dashboard server.
pub struct DashboardHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    addr: SocketAddr,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    /// Address the server is bound to.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Signal shutdown and wait for in-flight requests to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::error!("Dashboard server task failed: {}", e);
        }
    }
}

/// Bind and start the server in the background.
pub async fn start_server(config: Config) -> anyhow::Result<DashboardHandle> {
    let host = config.server.host.clone();
    let port = config.server.port;
    let app = build_router(DashboardServer::new(config));

    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    let addr = listener.local_addr()?;

    info!("Dashboard server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                info!("Dashboard server shutting down");
            })
            .await
        {
            tracing::error!("Dashboard server error: {}", e);
        }
    });

    Ok(DashboardHandle {
        shutdown_tx: Some(shutdown_tx),
        addr,
        task,
    })
}
