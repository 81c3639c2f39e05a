//! Config validation: unknown-key detection with Levenshtein suggestions
//! and sanity checks on slider ranges.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

const SLIDER_FIELDS: [&str; 5] = ["label", "min", "max", "default", "step"];
const SLIDERS: [&str; 4] = ["vibration", "temperature", "rolling_window", "days"];

/// Returns the complete set of valid dotted key paths for `DashboardConfig`.
///
/// Any new field added to `DashboardConfig` must be added here too.
pub fn known_config_keys() -> HashSet<String> {
    let mut keys: HashSet<String> = [
        "server",
        "server.addr",
        "models",
        "models.dir",
        "models.lstm_file",
        "models.isolation_forest_file",
        "models.scaler_file",
        "inputs",
        "risk",
        "risk.moderate",
        "risk.high",
    ]
    .iter()
    .map(|k| (*k).to_string())
    .collect();

    for slider in SLIDERS {
        keys.insert(format!("inputs.{slider}"));
        for field in SLIDER_FIELDS {
            keys.insert(format!("inputs.{slider}.{field}"));
        }
    }
    keys
}

/// Walk a TOML value and collect every dotted key path.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let toml::Value::Table(table) = value {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<String>) -> Option<String> {
    known
        .iter()
        .map(|k| (k, levenshtein(unknown, k)))
        .filter(|(_, d)| *d <= 3)
        .min_by(|(ka, da), (kb, db)| da.cmp(db).then_with(|| ka.cmp(kb)))
        .map(|(k, _)| k.clone())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new(); // parse errors are reported by serde
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Sanity Checks
// ============================================================================

/// Returns (errors, warnings). Errors prevent startup.
pub fn validate_ranges(config: &super::DashboardConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let inputs = &config.inputs;

    if inputs.vibration.min < 0.0 {
        errors.push(format!(
            "inputs.vibration.min = {:.2} cannot be negative",
            inputs.vibration.min
        ));
    }

    // Sensor temperatures outside -50..150 °C are not plausible for rail assets
    if inputs.temperature.min < -50.0 || inputs.temperature.max > 150.0 {
        warnings.push(ValidationWarning {
            field: "inputs.temperature".to_string(),
            message: format!(
                "temperature range [{:.1}, {:.1}] is outside the typical range (-50 to 150 °C)",
                inputs.temperature.min, inputs.temperature.max
            ),
            suggestion: None,
        });
    }

    for (name, spec) in [("rolling_window", &inputs.rolling_window), ("days", &inputs.days)] {
        if spec.min.fract() != 0.0 || spec.max.fract() != 0.0 || spec.default.fract() != 0.0 {
            warnings.push(ValidationWarning {
                field: format!("inputs.{name}"),
                message: format!("inputs.{name} is an integer slider; fractional bounds are truncated"),
                suggestion: None,
            });
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("hello", "hello"), 0);
        assert_eq!(levenshtein("moderat", "moderate"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [inputs.vibration]
            max = 25.0
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"inputs".to_string()));
        assert!(keys.contains(&"inputs.vibration".to_string()));
        assert!(keys.contains(&"inputs.vibration.max".to_string()));
    }

    #[test]
    fn test_unknown_key_gets_suggestion() {
        let warnings = validate_unknown_keys(
            r#"
            [risk]
            hihg = 0.8
            "#,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "risk.hihg");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("risk.high"));
    }

    #[test]
    fn test_known_keys_produce_no_warnings() {
        let text = super::super::DashboardConfig::default().to_toml().unwrap();
        assert!(validate_unknown_keys(&text).is_empty());
    }

    #[test]
    fn test_negative_vibration_rejected() {
        let mut cfg = super::super::DashboardConfig::default();
        cfg.inputs.vibration.min = -1.0;
        let (errors, _) = validate_ranges(&cfg);
        assert_eq!(errors.len(), 1);
    }
}
