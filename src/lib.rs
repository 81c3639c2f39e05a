//! Rail Sentinel: Rail Asset Failure Prediction
//!
//! Demonstration dashboard that turns two simulated sensor readings into a
//! failure probability and an anomaly score.
//!
//! ## Architecture
//!
//! - **Features**: fixed 7-element vector with stubbed rolling and FFT slots
//! - **Models**: pretrained min-max scaler, LSTM and isolation forest, loaded
//!   once at startup
//! - **Inference**: one prediction per request, banded for display
//! - **History**: synthetic hourly series for the charts
//! - **API**: axum JSON endpoints plus the embedded dashboard

pub mod api;
pub mod config;
pub mod features;
pub mod history;
pub mod inference;
pub mod models;
pub mod types;

pub use config::DashboardConfig;

pub use types::{
    AnomalyAssessment, AnomalyLabel, FailureAssessment, FeatureVector, HistoricalData,
    HistoryRow, Prediction, RiskLevel, SensorInput,
};

pub use models::{IsolationForest, LstmModel, MinMaxScaler, ModelBundle, ModelError};

pub use history::HistoryCache;
