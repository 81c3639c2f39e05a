//! Prediction endpoint

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Response;
use axum::Json;
use tracing::{error, info};

use crate::api::envelope::{ApiErrorResponse, ApiResponse};
use crate::config::DashboardConfig;
use crate::inference;
use crate::types::{AnomalyLabel, RiskLevel, SensorInput};

use super::{DashboardState, RequestCounters};

/// Reject readings the sliders could not have produced.
pub fn validate_input(input: &SensorInput, config: &DashboardConfig) -> Result<(), String> {
    let sliders = &config.inputs;
    let checks = [
        ("vibration", input.vibration, &sliders.vibration),
        ("temperature", input.temperature, &sliders.temperature),
        ("rolling_window", f64::from(input.rolling_window), &sliders.rolling_window),
    ];
    for (name, value, spec) in checks {
        if !spec.contains(value) {
            return Err(format!(
                "{name} = {value} is outside the allowed range [{}, {}]",
                spec.min, spec.max
            ));
        }
    }
    Ok(())
}

/// POST /api/v1/predict - run both models on the submitted slider values
pub async fn post_predict(
    State(state): State<DashboardState>,
    payload: Result<Json<SensorInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            RequestCounters::bump(&state.counters.rejected_inputs);
            return ApiErrorResponse::unprocessable(rejection.body_text());
        }
    };

    if let Err(msg) = validate_input(&input, &state.config) {
        RequestCounters::bump(&state.counters.rejected_inputs);
        return ApiErrorResponse::bad_request(msg);
    }

    let result = inference::predict(
        &state.models,
        &input,
        &state.config.risk,
        &mut rand::thread_rng(),
    );

    match result {
        Ok(prediction) => {
            RequestCounters::bump(&state.counters.predictions);
            if let Some(f) = &prediction.failure {
                if f.risk_level == RiskLevel::High {
                    RequestCounters::bump(&state.counters.high_risk);
                }
            }
            if let Some(a) = &prediction.anomaly {
                if a.label == AnomalyLabel::Anomalous {
                    RequestCounters::bump(&state.counters.anomalies);
                }
            }
            info!(
                vibration = input.vibration,
                temperature = input.temperature,
                failure = prediction.failure.as_ref().map_or("n/a", |f| f.display.as_str()),
                anomaly = prediction.anomaly.as_ref().map_or("n/a", |a| a.display.as_str()),
                "Prediction served"
            );
            ApiResponse::ok(prediction)
        }
        Err(e) => {
            error!(error = %e, "Inference failed");
            ApiErrorResponse::internal(format!("inference failed: {e}"))
        }
    }
}
