use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use repairdesk_core::period::PeriodToken;
use repairdesk_core::reports;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// `week`, `month` or `year`; anything else means all-time.
    #[serde(alias = "timeRange", alias = "period")]
    pub range: Option<String>,
}

impl RangeQuery {
    fn token(&self) -> PeriodToken {
        PeriodToken::parse(self.range.as_deref())
    }
}

/// `GET /api/stats/tickets?range=` - Ticket volume, status mix and trend.
pub async fn ticket_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = (state.today)();
    let report = reports::ticket_report(state.stats.as_ref(), query.token(), today).await?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/stats/customers` - All-time customer statistics.
pub async fn customer_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let today = (state.today)();
    let report = reports::customer_report(state.stats.as_ref(), today).await?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/stats/devices` - Device type distribution and brand/model rankings.
pub async fn device_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let report = reports::device_report(state.stats.as_ref()).await?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/stats/operations?range=` - Operation rankings and trend.
pub async fn operation_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = (state.today)();
    let report = reports::operation_report(state.stats.as_ref(), query.token(), today).await?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/stats/financial?range=` - Revenue with period-over-period change.
pub async fn financial_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = (state.today)();
    let report = reports::financial_report(state.stats.as_ref(), query.token(), today).await?;
    Ok(Json(json!({ "data": report })))
}

/// `GET /api/stats/dashboard?range=` - All five reports in one response.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = (state.today)();
    let report = reports::dashboard(state.stats.as_ref(), query.token(), today).await?;
    Ok(Json(json!({ "data": report })))
}
