//! Config Validation Tests
//!
//! Typo detection on unknown keys and range checks on slider definitions,
//! exercised independently from the HTTP layer.

use rail_sentinel::config::validation::{
    known_config_keys, suggest_correction, validate_ranges, validate_unknown_keys,
};
use rail_sentinel::config::{ConfigError, DashboardConfig, SliderSpec};

// ============================================================================
// Typo Detection Tests
// ============================================================================

#[test]
fn typo_in_risk_threshold_warns_with_suggestion() {
    let toml_str = r#"
[risk]
moderat = 0.4
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert!(warnings[0].field.contains("moderat"));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("risk.moderate"));
}

#[test]
fn typo_in_slider_field_warns() {
    let toml_str = r#"
[inputs.vibration]
label = "Vibration"
min = 0.0
max = 20.0
defualt = 5.0
step = 0.1
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].suggestion.as_deref(),
        Some("inputs.vibration.default")
    );
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[server]
addr = "127.0.0.1:9000"

[models]
dir = "/opt/rail/models"
lstm_file = "lstm.json"
isolation_forest_file = "forest.json"
scaler_file = "scaler.json"

[inputs.temperature]
label = "Temperature (°C)"
min = -10.0
max = 90.0
default = 25.0
step = 0.5

[inputs.days]
label = "Days"
min = 1
max = 14
default = 3
step = 1

[risk]
moderate = 0.4
high = 0.8
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert!(
        warnings.is_empty(),
        "Valid config should produce zero warnings, got: {:?}",
        warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()
    );
    let config = DashboardConfig::from_toml_str(toml_str).unwrap();
    assert_eq!(config.inputs.days.max, 14.0);
    assert_eq!(config.models.scaler_path().to_str(), Some("/opt/rail/models/scaler.json"));
}

#[test]
fn unknown_section_warns() {
    let warnings = validate_unknown_keys("[alerts]\nemail = \"ops@example.com\"\n");
    assert_eq!(warnings.len(), 2);
    assert!(warnings.iter().any(|w| w.field == "alerts"));
    assert!(warnings.iter().any(|w| w.field == "alerts.email"));
}

#[test]
fn empty_toml_produces_zero_warnings() {
    assert!(validate_unknown_keys("").is_empty());
}

#[test]
fn known_keys_cover_every_slider() {
    let keys = known_config_keys();
    for slider in ["vibration", "temperature", "rolling_window", "days"] {
        for field in ["label", "min", "max", "default", "step"] {
            let key = format!("inputs.{slider}.{field}");
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}

#[test]
fn suggest_correction_returns_none_for_garbage() {
    let keys = known_config_keys();
    assert_eq!(suggest_correction("zzzzzzzzzzzzzzzz", &keys), None);
    assert_eq!(
        suggest_correction("server.adr", &keys).as_deref(),
        Some("server.addr")
    );
}

// ============================================================================
// Range Validation Tests
// ============================================================================

#[test]
fn negative_vibration_min_is_error() {
    let mut config = DashboardConfig::default();
    config.inputs.vibration = SliderSpec::new("Vibration", -1.0, 20.0, 5.0, 0.1);
    let (errors, _) = validate_ranges(&config);
    assert_eq!(errors.len(), 1);
    assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
}

#[test]
fn implausible_temperature_range_only_warns() {
    let mut config = DashboardConfig::default();
    config.inputs.temperature = SliderSpec::new("Temperature (°C)", -80.0, 100.0, 30.0, 0.5);
    let (errors, warnings) = validate_ranges(&config);
    assert!(errors.is_empty());
    assert_eq!(warnings.len(), 1);
    assert!(config.validate().is_ok());
}

#[test]
fn days_beyond_supported_maximum_rejected() {
    let toml_str = r#"
[inputs.days]
label = "Days"
min = 1
max = 400
default = 7
step = 1
"#;
    let err = DashboardConfig::from_toml_str(toml_str).unwrap_err();
    assert!(err.to_string().contains("supported maximum"), "{err}");
}

#[test]
fn risk_threshold_outside_unit_interval_rejected() {
    let err = DashboardConfig::from_toml_str("[risk]\nhigh = 1.5\n").unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = DashboardConfig::from_toml_str("[risk\nhigh = 0.9").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_, _)));
}

#[test]
fn load_from_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rail_sentinel.toml");
    std::fs::write(&path, "[server]\naddr = \"127.0.0.1:8600\"\n").unwrap();
    let config = DashboardConfig::load_from_file(&path).unwrap();
    assert_eq!(config.server.addr, "127.0.0.1:8600");

    let missing = dir.path().join("absent.toml");
    let err = DashboardConfig::load_from_file(&missing).unwrap_err();
    assert!(err.to_string().contains("absent.toml"));
}
