//! Dashboard Configuration Module
//!
//! Slider ranges, risk bands, model artifact paths and the server address,
//! loaded from TOML.
//!
//! ## Loading Order
//!
//! 1. `RAIL_SENTINEL_CONFIG` environment variable (path to TOML file)
//! 2. `rail_sentinel.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! config::init(DashboardConfig::load());
//!
//! let high = config::get().risk.high;
//! ```

mod dashboard_config;
pub mod defaults;
pub mod validation;

pub use dashboard_config::*;

use std::sync::OnceLock;

/// Global dashboard configuration, initialized once at startup.
static DASHBOARD_CONFIG: OnceLock<DashboardConfig> = OnceLock::new();

/// Initialize the global dashboard configuration.
///
/// Later calls are ignored with a warning.
pub fn init(config: DashboardConfig) {
    if DASHBOARD_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once, ignoring");
    }
}

/// Get the global dashboard configuration, falling back to built-in
/// defaults when `init()` was never called (tests, one-shot CLI paths).
pub fn get() -> &'static DashboardConfig {
    DASHBOARD_CONFIG.get_or_init(DashboardConfig::default)
}

/// Check whether the config has been initialized.
pub fn is_initialized() -> bool {
    DASHBOARD_CONFIG.get().is_some()
}
