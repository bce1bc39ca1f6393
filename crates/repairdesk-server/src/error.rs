use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use repairdesk_core::error::ReportError;

/// Handler errors. A failed report is a server fault; the JSON body carries
/// a stable `code` for clients and the underlying fault text as `detail`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Report(e) = &self;
        tracing::error!(report = e.report(), error = %e, "Report computation failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": {
                    "code": "report_failed",
                    "message": "Failed to compute report",
                    "detail": e.to_string()
                }
            })),
        )
            .into_response()
    }
}
