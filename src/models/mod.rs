//! Pretrained model artifacts.
//!
//! Three artifacts are read once at startup and shared read-only:
//!
//! - [`MinMaxScaler`]: per-feature min-max scaling of the 7-element vector
//! - [`LstmModel`]: stacked LSTM + dense head producing a failure probability
//! - [`IsolationForest`]: tree ensemble producing a signed anomaly score
//!
//! All three are JSON exports of externally trained models. Nothing here
//! trains or mutates them.

mod bundle;
mod isolation_forest;
mod lstm;
mod scaler;

pub use bundle::{ArtifactKind, ArtifactStatus, ModelBundle};
pub use isolation_forest::{average_path_length, IsolationForest, IsolationTree, TreeNode};
pub use lstm::{Activation, DenseLayer, Layer, LstmLayer, LstmModel};
pub use scaler::MinMaxScaler;

use std::path::{Path, PathBuf};

/// Errors raised while loading or evaluating a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, serde_json::Error),
    #[error("invalid model: {0}")]
    Invalid(String),
    #[error("input has {actual} features, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("model produced a non-finite output")]
    NonFinite,
}

/// Read and deserialize a JSON artifact.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let data = std::fs::read(path).map_err(|e| ModelError::Io(path.to_path_buf(), e))?;
    serde_json::from_slice(&data).map_err(|e| ModelError::Parse(path.to_path_buf(), e))
}

/// Reject an input whose width differs from what the model was fitted on.
pub(crate) fn check_width(expected: usize, input: &[f64]) -> Result<(), ModelError> {
    if input.len() == expected {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch {
            expected,
            actual: input.len(),
        })
    }
}
