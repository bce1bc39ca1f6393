use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{routes, state::AppState};

/// The report router: `/health` plus the six read-only `/api/stats/*`
/// endpoints, traced per request. CORS origins come from
/// `REPAIRDESK_CORS_ORIGINS`; an empty list allows any origin.
pub fn build_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config.cors_origins))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/stats/tickets", get(routes::stats::ticket_stats))
        .route("/api/stats/customers", get(routes::stats::customer_stats))
        .route("/api/stats/devices", get(routes::stats::device_stats))
        .route("/api/stats/operations", get(routes::stats::operation_stats))
        .route("/api/stats/financial", get(routes::stats::financial_stats))
        .route("/api/stats/dashboard", get(routes::stats::dashboard))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed)
    }
}
