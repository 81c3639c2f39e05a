//! Observability: Prometheus metrics

use axum::extract::State;
use axum::response::IntoResponse;
use std::fmt::Write;

use super::{DashboardState, RequestCounters};

/// GET /api/v1/metrics
///
/// Runtime counters in Prometheus text format (version 0.0.4), hand-formatted
/// from the request counters.
pub async fn get_metrics(State(state): State<DashboardState>) -> impl IntoResponse {
    let c = &state.counters;
    let mut body = String::with_capacity(1024);

    let mut emit = |name: &str, kind: &str, help: &str, value: u64| {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} {kind}");
        let _ = writeln!(body, "{name} {value}");
    };

    emit(
        "rail_sentinel_predictions_total",
        "counter",
        "Predictions served",
        RequestCounters::read(&c.predictions),
    );
    emit(
        "rail_sentinel_anomalies_total",
        "counter",
        "Predictions whose anomaly score was negative",
        RequestCounters::read(&c.anomalies),
    );
    emit(
        "rail_sentinel_high_risk_total",
        "counter",
        "Predictions in the high failure-risk band",
        RequestCounters::read(&c.high_risk),
    );
    emit(
        "rail_sentinel_rejected_inputs_total",
        "counter",
        "Prediction requests rejected as malformed or out of range",
        RequestCounters::read(&c.rejected_inputs),
    );
    emit(
        "rail_sentinel_history_requests_total",
        "counter",
        "Synthetic history requests",
        RequestCounters::read(&c.history_requests),
    );
    emit(
        "rail_sentinel_models_loaded",
        "gauge",
        "Model artifacts loaded at startup",
        state.models.statuses.iter().filter(|s| s.loaded).count() as u64,
    );
    emit(
        "rail_sentinel_uptime_seconds",
        "gauge",
        "Process uptime in seconds",
        state.uptime_secs(),
    );

    (
        axum::http::StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}
