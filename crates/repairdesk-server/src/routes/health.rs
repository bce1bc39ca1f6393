use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// `GET /health`: 200 while the report store answers, 503 otherwise.
#[tracing::instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthBody>) {
    let (status, label, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "ok", "reachable"),
        Err(e) => {
            tracing::error!(error = %e, "report store unreachable");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        }
    };

    (
        status,
        Json(HealthBody {
            status: label,
            version: env!("CARGO_PKG_VERSION"),
            database,
        }),
    )
}
