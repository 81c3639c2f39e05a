//! Dashboard configuration (TOML).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RAIL_SENTINEL_CONFIG";

/// Config file searched for in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "rail_sentinel.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a dashboard deployment.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$RAIL_SENTINEL_CONFIG` env var
/// 2. `./rail_sentinel.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model artifact locations
    #[serde(default)]
    pub models: ModelsConfig,

    /// Slider ranges shown in the sidebar
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Failure probability banding
    #[serde(default)]
    pub risk: RiskConfig,
}

impl DashboardConfig {
    /// Load configuration using the standard search order:
    /// 1. `$RAIL_SENTINEL_CONFIG` environment variable
    /// 2. `./rail_sentinel.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded dashboard config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded dashboard config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys are logged, not rejected.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Check slider ranges and risk bands.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        self.inputs.vibration.check("inputs.vibration", &mut errors);
        self.inputs.temperature.check("inputs.temperature", &mut errors);
        self.inputs.rolling_window.check("inputs.rolling_window", &mut errors);
        self.inputs.days.check("inputs.days", &mut errors);

        if self.inputs.rolling_window.min < 1.0 {
            errors.push("inputs.rolling_window.min must be >= 1".to_string());
        }
        if self.inputs.days.min < 1.0 {
            errors.push("inputs.days.min must be >= 1".to_string());
        }
        if self.inputs.days.max > f64::from(defaults::MAX_HISTORY_DAYS) {
            errors.push(format!(
                "inputs.days.max = {} exceeds the supported maximum of {} days",
                self.inputs.days.max,
                defaults::MAX_HISTORY_DAYS
            ));
        }

        let r = &self.risk;
        if !(0.0..=1.0).contains(&r.moderate) || !(0.0..=1.0).contains(&r.high) {
            errors.push(format!(
                "risk thresholds must lie in [0, 1] (got moderate={}, high={})",
                r.moderate, r.high
            ));
        } else if r.high < r.moderate {
            errors.push(format!(
                "risk.high ({:.3}) must be >= risk.moderate ({:.3})",
                r.high, r.moderate
            ));
        }

        let (range_errors, range_warnings) = super::validation::validate_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the HTTP server
    #[serde(default = "default_addr")]
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { addr: default_addr() }
    }
}

fn default_addr() -> String {
    defaults::SERVER_ADDR.to_string()
}

/// Where the three pretrained artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_models_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_lstm_file")]
    pub lstm_file: String,
    #[serde(default = "default_isolation_forest_file")]
    pub isolation_forest_file: String,
    #[serde(default = "default_scaler_file")]
    pub scaler_file: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            dir: default_models_dir(),
            lstm_file: default_lstm_file(),
            isolation_forest_file: default_isolation_forest_file(),
            scaler_file: default_scaler_file(),
        }
    }
}

impl ModelsConfig {
    pub fn lstm_path(&self) -> PathBuf {
        self.dir.join(&self.lstm_file)
    }

    pub fn isolation_forest_path(&self) -> PathBuf {
        self.dir.join(&self.isolation_forest_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.dir.join(&self.scaler_file)
    }
}

fn default_models_dir() -> PathBuf {
    PathBuf::from(defaults::MODELS_DIR)
}

fn default_lstm_file() -> String {
    defaults::LSTM_MODEL_FILE.to_string()
}

fn default_isolation_forest_file() -> String {
    defaults::ISOLATION_FOREST_FILE.to_string()
}

fn default_scaler_file() -> String {
    defaults::SCALER_FILE.to_string()
}

/// A single slider: label, bounds, initial value and step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderSpec {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
}

impl SliderSpec {
    pub fn new(label: &str, min: f64, max: f64, default: f64, step: f64) -> Self {
        Self {
            label: label.to_string(),
            min,
            max,
            default,
            step,
        }
    }

    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    fn check(&self, name: &str, errors: &mut Vec<String>) {
        if !self.min.is_finite() || !self.max.is_finite() || !self.default.is_finite() {
            errors.push(format!("{name}: bounds and default must be finite"));
            return;
        }
        if self.min >= self.max {
            errors.push(format!(
                "{name}: min ({}) must be < max ({})",
                self.min, self.max
            ));
        }
        if !self.contains(self.default) {
            errors.push(format!(
                "{name}: default ({}) must lie within [{}, {}]",
                self.default, self.min, self.max
            ));
        }
        if self.step <= 0.0 {
            errors.push(format!("{name}: step must be > 0"));
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    #[serde(default = "default_vibration")]
    pub vibration: SliderSpec,
    #[serde(default = "default_temperature")]
    pub temperature: SliderSpec,
    #[serde(default = "default_rolling_window")]
    pub rolling_window: SliderSpec,
    #[serde(default = "default_days")]
    pub days: SliderSpec,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            vibration: default_vibration(),
            temperature: default_temperature(),
            rolling_window: default_rolling_window(),
            days: default_days(),
        }
    }
}

fn default_vibration() -> SliderSpec {
    SliderSpec::new("Vibration", 0.0, 20.0, 5.0, 0.1)
}

fn default_temperature() -> SliderSpec {
    SliderSpec::new("Temperature (°C)", 20.0, 100.0, 30.0, 0.5)
}

fn default_rolling_window() -> SliderSpec {
    SliderSpec::new("Rolling Average Window", 1.0, 48.0, 24.0, 1.0)
}

fn default_days() -> SliderSpec {
    SliderSpec::new("Days to simulate", 1.0, 30.0, 7.0, 1.0)
}

/// Failure probability bands: above `high` is critical, above `moderate` warns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_moderate")]
    pub moderate: f64,
    #[serde(default = "default_high")]
    pub high: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            moderate: default_moderate(),
            high: default_high(),
        }
    }
}

fn default_moderate() -> f64 {
    defaults::MODERATE_RISK_THRESHOLD
}

fn default_high() -> f64 {
    defaults::HIGH_RISK_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(DashboardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg = DashboardConfig::from_toml_str(
            r#"
            [server]
            addr = "127.0.0.1:9000"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.addr, "127.0.0.1:9000");
        assert_eq!(cfg.inputs.vibration.max, 20.0);
        assert_eq!(cfg.risk.high, 0.7);
        assert_eq!(cfg.models.lstm_path(), PathBuf::from("models/lstm_rail_model.json"));
    }

    #[test]
    fn test_inverted_risk_bands_rejected() {
        let err = DashboardConfig::from_toml_str(
            r#"
            [risk]
            moderate = 0.8
            high = 0.6
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("risk.high"));
    }

    #[test]
    fn test_default_outside_slider_rejected() {
        let mut cfg = DashboardConfig::default();
        cfg.inputs.temperature.default = 150.0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("inputs.temperature"));
    }

    #[test]
    fn test_toml_roundtrip_keeps_sliders() {
        let cfg = DashboardConfig::default();
        let text = cfg.to_toml().unwrap();
        let back = DashboardConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.inputs.days, cfg.inputs.days);
    }

    #[test]
    fn test_slider_contains_rejects_nan() {
        let s = default_vibration();
        assert!(s.contains(0.0));
        assert!(s.contains(20.0));
        assert!(!s.contains(20.01));
        assert!(!s.contains(f64::NAN));
    }
}
