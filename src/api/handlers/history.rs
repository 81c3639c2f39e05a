//! Synthetic history endpoint

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;

use crate::api::envelope::{ApiErrorResponse, ApiResponse};

use super::{DashboardState, RequestCounters};

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Days to simulate (defaults to the slider's initial value)
    #[serde(default)]
    pub days: Option<u32>,
}

/// GET /api/v1/history?days=N - hourly synthetic readings ending now
pub async fn get_history(
    State(state): State<DashboardState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let spec = &state.config.inputs.days;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let days = query.days.unwrap_or(spec.default as u32);

    if !spec.contains(f64::from(days)) {
        return ApiErrorResponse::bad_request(format!(
            "days = {days} is outside the allowed range [{}, {}]",
            spec.min, spec.max
        ));
    }

    RequestCounters::bump(&state.counters.history_requests);
    let data = state.history.get_or_generate(days);
    ApiResponse::ok(data.as_ref())
}
