//! System state endpoints: health, model load status, slider definitions

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::api::envelope::ApiResponse;
use crate::config::SliderSpec;
use crate::models::ArtifactStatus;

use super::DashboardState;

// ============================================================================
// Health Endpoint
// ============================================================================

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every artifact loaded, `degraded` otherwise
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub models_loaded: bool,
}

/// GET /health, GET /api/v1/health
pub async fn get_health(State(state): State<DashboardState>) -> Json<HealthResponse> {
    let models_loaded = state.models.all_loaded();
    Json(HealthResponse {
        status: if models_loaded { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_secs(),
        models_loaded,
    })
}

// ============================================================================
// Model Status Endpoint
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub all_loaded: bool,
    pub artifacts: Vec<ArtifactStatus>,
    /// Messages the dashboard shows in its error banner
    pub errors: Vec<String>,
}

/// GET /api/v1/models - per-artifact load outcome from startup
pub async fn get_models(State(state): State<DashboardState>) -> Response {
    ApiResponse::ok(ModelsResponse {
        all_loaded: state.models.all_loaded(),
        artifacts: state.models.statuses.clone(),
        errors: state.models.load_errors(),
    })
}

// ============================================================================
// Slider Definitions Endpoint
// ============================================================================

#[derive(Debug, Serialize)]
pub struct InputsResponse {
    pub vibration: SliderSpec,
    pub temperature: SliderSpec,
    pub rolling_window: SliderSpec,
    pub days: SliderSpec,
}

/// GET /api/v1/inputs - slider ranges the dashboard renders
pub async fn get_inputs(State(state): State<DashboardState>) -> Response {
    let inputs = &state.config.inputs;
    ApiResponse::ok(InputsResponse {
        vibration: inputs.vibration.clone(),
        temperature: inputs.temperature.clone(),
        rolling_window: inputs.rolling_window.clone(),
        days: inputs.days.clone(),
    })
}
