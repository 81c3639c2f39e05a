//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the /api/v1/* endpoints using `tower::ServiceExt::oneshot()`.
//! Models are loaded from the shipped `models/` directory.

use rail_sentinel::api::{create_app, DashboardState};
use rail_sentinel::config::{DashboardConfig, ModelsConfig};
use rail_sentinel::models::ModelBundle;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::path::PathBuf;
use tower::ServiceExt;

fn shipped_models() -> ModelsConfig {
    ModelsConfig {
        dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("models"),
        ..ModelsConfig::default()
    }
}

fn create_test_app() -> Router {
    let config = DashboardConfig::default();
    let bundle = ModelBundle::load(&shipped_models());
    create_app(DashboardState::new(bundle, config))
}

fn create_app_without_models() -> Router {
    let dir = tempfile::tempdir().unwrap();
    let models = ModelsConfig {
        dir: dir.path().join("missing"),
        ..ModelsConfig::default()
    };
    let bundle = ModelBundle::load(&models);
    create_app(DashboardState::new(bundle, DashboardConfig::default()))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let resp = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// All v1 GET endpoints should return 200.
#[tokio::test]
async fn test_v1_get_endpoints_return_200() {
    let endpoints = [
        "/api/v1/health",
        "/api/v1/models",
        "/api/v1/inputs",
        "/api/v1/history",
        "/api/v1/history?days=3",
        "/api/v1/metrics",
        "/health",
    ];

    for endpoint in &endpoints {
        let (status, _) = get(create_test_app(), endpoint).await;
        assert!(status.is_success(), "GET {endpoint} returned status {status}");
    }
}

/// Shipped artifacts all load and health reports ok.
#[tokio::test]
async fn test_health_reports_loaded_models() {
    let (status, body) = get(create_test_app(), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["models_loaded"], true);
}

#[tokio::test]
async fn test_health_degraded_without_models() {
    let (_, body) = get(create_app_without_models(), "/api/v1/health").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "degraded");

    let (_, body) = get(create_app_without_models(), "/api/v1/models").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["all_loaded"], false);
    assert_eq!(json["data"]["errors"].as_array().unwrap().len(), 3);
}

/// Slider definitions come back in the envelope with the default ranges.
#[tokio::test]
async fn test_inputs_slider_ranges() {
    let (_, body) = get(create_test_app(), "/api/v1/inputs").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let data = &json["data"];
    assert_eq!(data["vibration"]["min"], 0.0);
    assert_eq!(data["vibration"]["max"], 20.0);
    assert_eq!(data["temperature"]["max"], 100.0);
    assert_eq!(data["rolling_window"]["default"], 24.0);
    assert_eq!(data["days"]["max"], 30.0);
    assert_eq!(json["meta"]["version"], "1");
}

#[tokio::test]
async fn test_predict_nominal_reading() {
    let (status, json) = post_json(
        create_test_app(),
        "/api/v1/predict",
        r#"{"vibration": 5.0, "temperature": 30.0, "rolling_window": 24}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["raw_features"].as_array().unwrap().len(), 7);
    assert_eq!(data["raw_features"][0], 5.0);
    assert_eq!(data["raw_features"][4], 0.0);
    assert_eq!(data["failure"]["risk_level"], "normal");
    assert_eq!(data["failure"]["bar"]["color"], "green");
    assert_eq!(data["anomaly"]["label"], "normal");
    assert!(data["load_errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_predict_extreme_reading() {
    let (status, json) = post_json(
        create_test_app(),
        "/api/v1/predict",
        r#"{"vibration": 19.0, "temperature": 95.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &json["data"];
    assert_eq!(data["input"]["rolling_window"], 24);
    assert_eq!(data["failure"]["risk_level"], "high");
    assert_eq!(data["failure"]["bar"]["color"], "red");
    assert_eq!(data["anomaly"]["label"], "anomalous");
    assert_eq!(data["anomaly"]["bar"]["color"], "orange");
    assert!(data["anomaly"]["score"].as_f64().unwrap() < 0.0);
}

/// Missing artifacts skip their block and surface the load error.
#[tokio::test]
async fn test_predict_without_models_returns_errors() {
    let (status, json) = post_json(
        create_app_without_models(),
        "/api/v1/predict",
        r#"{"vibration": 5.0, "temperature": 30.0}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert!(data["failure"].is_null());
    assert!(data["anomaly"].is_null());
    assert_eq!(data["load_errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_predict_out_of_range_is_400() {
    for body in [
        r#"{"vibration": 25.0, "temperature": 30.0}"#,
        r#"{"vibration": 5.0, "temperature": 10.0}"#,
        r#"{"vibration": 5.0, "temperature": 30.0, "rolling_window": 0}"#,
        r#"{"vibration": -1.0, "temperature": 30.0}"#,
    ] {
        let (status, json) = post_json(create_test_app(), "/api/v1/predict", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_predict_malformed_json_is_422() {
    let (status, json) = post_json(
        create_test_app(),
        "/api/v1/predict",
        r#"{"vibration": "loud"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_object());
}

#[tokio::test]
async fn test_history_row_count() {
    let (status, body) = get(create_test_app(), "/api/v1/history?days=2").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["days"], 2);
    assert_eq!(json["data"]["rows"].as_array().unwrap().len(), 48);

    let (_, body) = get(create_test_app(), "/api/v1/history").await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["rows"].as_array().unwrap().len(), 24 * 7);
}

#[tokio::test]
async fn test_history_out_of_range_is_400() {
    for uri in ["/api/v1/history?days=0", "/api/v1/history?days=31"] {
        let (status, _) = get(create_test_app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "GET {uri}");
    }
}

#[tokio::test]
async fn test_metrics_prometheus_text() {
    let (status, body) = get(create_test_app(), "/api/v1/metrics").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("# TYPE rail_sentinel_predictions_total counter"));
    assert!(text.contains("rail_sentinel_models_loaded 3"));
}

/// Unknown API routes get a JSON 404, not the SPA page.
#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let (status, body) = get(create_test_app(), "/api/v1/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["code"], "NOT_FOUND");
}

/// Non-API paths fall back to the embedded dashboard.
#[tokio::test]
async fn test_spa_fallback_serves_dashboard() {
    for uri in ["/", "/some/client/route"] {
        let (status, body) = get(create_test_app(), uri).await;
        assert_eq!(status, StatusCode::OK, "GET {uri}");
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<html"), "GET {uri} did not return HTML");
    }
}
