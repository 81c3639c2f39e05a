//! API route handlers
//!
//! - Health, model load status and slider definitions
//! - Prediction (feature assembly, scaling, both models)
//! - Synthetic history for the charts
//! - Prometheus counters

mod history;
mod metrics;
mod predict;
mod status;

pub use history::*;
pub use metrics::*;
pub use predict::*;
pub use status::*;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::config::DashboardConfig;
use crate::history::HistoryCache;
use crate::models::ModelBundle;

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Clone)]
pub struct DashboardState {
    /// Model handles loaded once at startup, read-only afterwards
    pub models: Arc<ModelBundle>,
    /// Slider ranges and risk bands
    pub config: Arc<DashboardConfig>,
    /// Memoised synthetic history, keyed by day count
    pub history: HistoryCache,
    /// Request counters for /metrics
    pub counters: Arc<RequestCounters>,
    /// Process start, for uptime
    pub started_at: Instant,
}

impl DashboardState {
    pub fn new(models: ModelBundle, config: DashboardConfig) -> Self {
        Self {
            models: Arc::new(models),
            config: Arc::new(config),
            history: HistoryCache::new(),
            counters: Arc::new(RequestCounters::default()),
            started_at: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Monotonic counters exposed on /metrics.
#[derive(Debug, Default)]
pub struct RequestCounters {
    pub predictions: AtomicU64,
    pub anomalies: AtomicU64,
    pub high_risk: AtomicU64,
    pub rejected_inputs: AtomicU64,
    pub history_requests: AtomicU64,
}

impl RequestCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read(counter: &AtomicU64) -> u64 {
        counter.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;

    fn create_test_state() -> DashboardState {
        DashboardState::new(ModelBundle::from_parts(None, None, None), DashboardConfig::default())
    }

    #[tokio::test]
    async fn test_health_reports_missing_models() {
        let state = create_test_state();
        let response = get_health(State(state)).await;
        assert_eq!(response.0.status, "degraded");
        assert!(!response.0.models_loaded);
    }

    #[tokio::test]
    async fn test_counters_start_at_zero() {
        let state = create_test_state();
        assert_eq!(RequestCounters::read(&state.counters.predictions), 0);
        RequestCounters::bump(&state.counters.predictions);
        assert_eq!(RequestCounters::read(&state.counters.predictions), 1);
    }
}
