//! Shared data types for the rail asset dashboard.
//!
//! Everything here is transient: built per request, serialized to the
//! dashboard, then dropped.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::config::defaults::FEATURE_COUNT;

// ============================================================================
// Inputs
// ============================================================================

/// Slider readings submitted with a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorInput {
    /// Vibration reading
    pub vibration: f64,
    /// Temperature reading (°C)
    pub temperature: f64,
    /// Rolling average window (hours). Accepted and echoed, not used for
    /// feature computation.
    #[serde(default = "default_rolling_window")]
    pub rolling_window: u32,
}

const fn default_rolling_window() -> u32 {
    24
}

// ============================================================================
// Feature Vector
// ============================================================================

/// Names of the seven features, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "vibration",
    "temperature",
    "vibration_rolling",
    "temperature_rolling",
    "fft_0",
    "fft_1",
    "fft_2",
];

/// Fixed-length model input:
/// `[vibration, temperature, vibration_rolling, temperature_rolling, 0, 0, 0]`.
///
/// The last three entries are FFT placeholders and stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub const fn len(&self) -> usize {
        FEATURE_COUNT
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Leading `n` features (clamped to the vector length).
    pub fn head(&self, n: usize) -> &[f64] {
        &self.0[..n.min(FEATURE_COUNT)]
    }
}

// ============================================================================
// Prediction Output
// ============================================================================

/// Failure probability band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Normal,
    Moderate,
    High,
}

impl RiskLevel {
    /// Banner text shown beneath the failure metric.
    pub const fn message(self) -> &'static str {
        match self {
            Self::High => "High probability of failure - Immediate inspection recommended!",
            Self::Moderate => "Moderate probability of failure - Schedule inspection",
            Self::Normal => "Normal operation",
        }
    }

    /// Banner style: `error`, `warning` or `success`.
    pub const fn banner(self) -> &'static str {
        match self {
            Self::High => "error",
            Self::Moderate => "warning",
            Self::Normal => "success",
        }
    }
}

/// Anomaly label derived from the sign of the anomaly score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyLabel {
    Anomalous,
    Normal,
}

impl AnomalyLabel {
    /// Negative scores are anomalous.
    pub fn from_score(score: f64) -> Self {
        if score < 0.0 {
            Self::Anomalous
        } else {
            Self::Normal
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Anomalous => "Anomaly detected in sensor readings!",
            Self::Normal => "Normal sensor behavior",
        }
    }

    pub const fn banner(self) -> &'static str {
        match self {
            Self::Anomalous => "error",
            Self::Normal => "success",
        }
    }
}

/// Single horizontal bar indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarIndicator {
    pub label: String,
    pub value: f64,
    pub color: String,
    /// Fixed x-axis upper bound; `None` lets the chart autoscale.
    pub x_max: Option<f64>,
}

/// Failure half of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureAssessment {
    /// Model output in [0, 1]
    pub probability: f64,
    /// Percentage display string, e.g. `"12.34%"`
    pub display: String,
    pub risk_level: RiskLevel,
    pub message: String,
    pub banner: String,
    pub bar: BarIndicator,
}

/// Anomaly half of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAssessment {
    /// Decision function output; negative means anomalous
    pub score: f64,
    /// Two-decimal display string
    pub display: String,
    pub label: AnomalyLabel,
    pub message: String,
    pub banner: String,
    pub bar: BarIndicator,
}

/// Full result of one Predict press.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub input: SensorInput,
    /// Features as assembled, before scaling
    pub raw_features: FeatureVector,
    /// Features after the scaler; absent when no scaler is loaded
    pub scaled_features: Option<FeatureVector>,
    /// Absent when the sequence model or the scaler failed to load
    pub failure: Option<FailureAssessment>,
    /// Absent when the outlier model or the scaler failed to load
    pub anomaly: Option<AnomalyAssessment>,
    /// Startup model load errors to display alongside the result
    pub load_errors: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Synthetic History
// ============================================================================

/// One hourly sample of simulated sensor history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub time: DateTime<Utc>,
    pub vibration: f64,
    pub temperature: f64,
}

/// `24 x days` hourly rows, oldest first, ending at `end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalData {
    pub days: u32,
    pub end: DateTime<Utc>,
    pub rows: Vec<HistoryRow>,
}

impl HistoricalData {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV with an RFC 3339 `Time` column.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(self.rows.len() * 48 + 32);
        out.push_str("Time,Vibration,Temperature\n");
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{},{:.6},{:.6}",
                row.time.to_rfc3339(),
                row.vibration,
                row.temperature
            );
        }
        out
    }
}
