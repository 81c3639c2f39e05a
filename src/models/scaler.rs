//! Min-max feature scaler.
//!
//! ```text
//! scale[i]  = (range_max - range_min) / (data_max[i] - data_min[i])
//! scaled[i] = (x[i] - data_min[i]) * scale[i] + range_min
//! ```
//!
//! A feature that was constant during fitting (zero data range) uses a
//! divisor of 1, so it maps to `range_min + (x - data_min)`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{check_width, read_json, ModelError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    /// Target range, `(0, 1)` unless the scaler was fitted otherwise.
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

const fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

impl MinMaxScaler {
    /// Build and validate a scaler from fitted statistics.
    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>, feature_range: (f64, f64)) -> Result<Self, ModelError> {
        let scaler = Self {
            data_min,
            data_max,
            feature_range,
        };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let scaler: Self = read_json(path)?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Number of features this scaler was fitted on.
    pub fn n_features(&self) -> usize {
        self.data_min.len()
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.data_min.is_empty() {
            return Err(ModelError::Invalid("scaler has no features".into()));
        }
        if self.data_min.len() != self.data_max.len() {
            return Err(ModelError::Invalid(format!(
                "scaler data_min has {} entries but data_max has {}",
                self.data_min.len(),
                self.data_max.len()
            )));
        }
        let (lo, hi) = self.feature_range;
        if lo.is_nan() || hi.is_nan() || lo >= hi {
            return Err(ModelError::Invalid(format!(
                "scaler feature_range ({lo}, {hi}) must be increasing"
            )));
        }
        if self
            .data_min
            .iter()
            .chain(&self.data_max)
            .any(|v| !v.is_finite())
        {
            return Err(ModelError::Invalid("scaler statistics must be finite".into()));
        }
        Ok(())
    }

    /// Scale one sample.
    pub fn transform(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width(self.n_features(), x)?;
        let (lo, hi) = self.feature_range;
        Ok(x.iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(&v, (&min, &max))| {
                let range = max - min;
                let range = if range == 0.0 { 1.0 } else { range };
                (v - min) * ((hi - lo) / range) + lo
            })
            .collect())
    }
}
