//! API route definitions
//!
//! - /api/v1/health - liveness and model availability
//! - /api/v1/models - per-artifact load status
//! - /api/v1/inputs - slider definitions
//! - /api/v1/predict - failure probability and anomaly score
//! - /api/v1/history - synthetic sensor history
//! - /api/v1/metrics - Prometheus counters

use axum::http::Uri;
use axum::response::Response;
use axum::{routing::{get, post}, Router};

use super::envelope::ApiErrorResponse;
use super::handlers::{self, DashboardState};

/// Create all API routes for the dashboard
pub fn api_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .route("/models", get(handlers::get_models))
        .route("/inputs", get(handlers::get_inputs))
        .route("/predict", post(handlers::post_predict))
        .route("/history", get(handlers::get_history))
        .route("/metrics", get(handlers::get_metrics))
        // Unknown API paths get an envelope error, not the SPA
        .fallback(api_not_found)
        .with_state(state)
}

/// Health endpoint at root level for load balancers
pub fn root_routes(state: DashboardState) -> Router {
    Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state)
}

async fn api_not_found(uri: Uri) -> Response {
    ApiErrorResponse::not_found(format!("no API endpoint at {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::models::ModelBundle;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn create_test_state() -> DashboardState {
        DashboardState::new(ModelBundle::from_parts(None, None, None), DashboardConfig::default())
    }

    async fn status_of(uri: &str) -> StatusCode {
        api_routes(create_test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_api_routes_get_endpoints() {
        for uri in ["/health", "/models", "/inputs", "/history", "/metrics"] {
            assert_eq!(status_of(uri).await, StatusCode::OK, "GET {uri}");
        }
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_404() {
        assert_eq!(status_of("/nope").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_predict_requires_post() {
        assert_eq!(status_of("/predict").await, StatusCode::METHOD_NOT_ALLOWED);
    }
}
