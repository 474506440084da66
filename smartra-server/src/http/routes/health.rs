//! Service health
//!
//! Reports the upload directory and pool occupancy. Never opens a new
//! database connection.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when attachments cannot be stored
    pub status: &'static str,
    pub version: &'static str,
    pub uploads: UploadsHealth,
    pub database: PoolHealth,
}

#[derive(Debug, Serialize)]
pub struct UploadsHealth {
    pub dir: String,
    pub ready: bool,
}

#[derive(Debug, Serialize)]
pub struct PoolHealth {
    /// Connections currently open
    pub connections: u32,
    pub idle: usize,
    pub closed: bool,
}

async fn report(state: &AppState) -> HealthReport {
    let ready = state.uploads.is_ready().await;
    let closed = state.pool.is_closed();

    HealthReport {
        status: if ready && !closed { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uploads: UploadsHealth {
            dir: state.uploads.root().display().to_string(),
            ready,
        },
        database: PoolHealth {
            connections: state.pool.size(),
            idle: state.pool.num_idle(),
            closed,
        },
    }
}

/// GET /health - 200 when healthy, 503 when degraded
async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthReport>) {
    let report = report(&state).await;
    let status = if report.status == "ok" {
        StatusCode::OK
    } else {
        tracing::warn!(upload_dir = %report.uploads.dir, "health check degraded");
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
