//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Server
// ============================================================================

/// Default HTTP bind address.
pub const SERVER_ADDR: &str = "0.0.0.0:8501";

/// Maximum accepted request body (bytes). Predict bodies are three numbers.
pub const MAX_REQUEST_BODY_BYTES: usize = 16 * 1024;

// ============================================================================
// Model Artifacts
// ============================================================================

/// Directory searched for the pretrained artifacts.
pub const MODELS_DIR: &str = "models";

/// Sequence model (failure probability).
pub const LSTM_MODEL_FILE: &str = "lstm_rail_model.json";

/// Outlier-detection model (anomaly score).
pub const ISOLATION_FOREST_FILE: &str = "isolation_forest.json";

/// Min-max feature scaler.
pub const SCALER_FILE: &str = "scaler.json";

// ============================================================================
// Features
// ============================================================================

/// Length of the assembled feature vector.
pub const FEATURE_COUNT: usize = 7;

/// Number of leading features the anomaly model consumes.
pub const ANOMALY_FEATURE_COUNT: usize = 5;

/// Bounds of the uniform jitter applied to stand in for rolling averages.
pub const ROLLING_JITTER_MIN: f64 = 0.9;
pub const ROLLING_JITTER_MAX: f64 = 1.1;

// ============================================================================
// Risk Banding
// ============================================================================

/// Failure probability above which an inspection should be scheduled.
pub const MODERATE_RISK_THRESHOLD: f64 = 0.5;

/// Failure probability above which immediate inspection is recommended.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

// ============================================================================
// Synthetic History
// ============================================================================

/// Samples per simulated day (hourly).
pub const HOURS_PER_DAY: u32 = 24;

/// Upper bound on simulated days, regardless of slider config.
pub const MAX_HISTORY_DAYS: u32 = 365;

/// Default days when the request does not specify any.
pub const DEFAULT_HISTORY_DAYS: u32 = 7;

/// Vibration sine amplitude.
pub const HISTORY_VIBRATION_AMPLITUDE: f64 = 5.0;

/// Vibration noise standard deviation.
pub const HISTORY_VIBRATION_NOISE_STD: f64 = 1.0;

/// Temperature trend start / end (°C).
pub const HISTORY_TEMPERATURE_START: f64 = 20.0;
pub const HISTORY_TEMPERATURE_END: f64 = 35.0;

/// Temperature noise standard deviation.
pub const HISTORY_TEMPERATURE_NOISE_STD: f64 = 3.0;
