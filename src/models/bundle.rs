//! Process-wide model handles, loaded once at startup.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::{IsolationForest, LstmModel, MinMaxScaler, ModelError};
use crate::config::defaults::{ANOMALY_FEATURE_COUNT, FEATURE_COUNT};
use crate::config::ModelsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    SequenceModel,
    IsolationForest,
    Scaler,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SequenceModel => write!(f, "sequence model"),
            Self::IsolationForest => write!(f, "isolation forest"),
            Self::Scaler => write!(f, "scaler"),
        }
    }
}

/// Outcome of loading one artifact.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStatus {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub loaded: bool,
    pub error: Option<String>,
}

/// The three pretrained handles. A handle is `None` when its artifact failed
/// to load; the failure is kept in `statuses` for display.
#[derive(Debug, Default)]
pub struct ModelBundle {
    pub lstm: Option<LstmModel>,
    pub forest: Option<IsolationForest>,
    pub scaler: Option<MinMaxScaler>,
    pub statuses: Vec<ArtifactStatus>,
}

impl ModelBundle {
    /// Load every artifact named in the config. Never fails as a whole:
    /// each artifact that cannot be read or does not fit the 7-feature
    /// layout is logged and left out.
    pub fn load(config: &ModelsConfig) -> Self {
        let mut statuses = Vec::with_capacity(3);

        let lstm = load_one(
            ArtifactKind::SequenceModel,
            &config.lstm_path(),
            &mut statuses,
            |p| {
                let model = LstmModel::load(p)?;
                expect_width(model.input_dim, FEATURE_COUNT)?;
                Ok(model)
            },
        );
        let forest = load_one(
            ArtifactKind::IsolationForest,
            &config.isolation_forest_path(),
            &mut statuses,
            |p| {
                let forest = IsolationForest::load(p)?;
                expect_width(forest.n_features, ANOMALY_FEATURE_COUNT)?;
                Ok(forest)
            },
        );
        let scaler = load_one(ArtifactKind::Scaler, &config.scaler_path(), &mut statuses, |p| {
            let scaler = MinMaxScaler::load(p)?;
            expect_width(scaler.n_features(), FEATURE_COUNT)?;
            Ok(scaler)
        });

        Self {
            lstm,
            forest,
            scaler,
            statuses,
        }
    }

    /// Build a bundle from in-memory handles (tests, embedding).
    pub fn from_parts(
        lstm: Option<LstmModel>,
        forest: Option<IsolationForest>,
        scaler: Option<MinMaxScaler>,
    ) -> Self {
        let status = |kind: ArtifactKind, loaded: bool| ArtifactStatus {
            kind,
            path: PathBuf::new(),
            loaded,
            error: (!loaded).then(|| format!("{kind} not provided")),
        };
        let statuses = vec![
            status(ArtifactKind::SequenceModel, lstm.is_some()),
            status(ArtifactKind::IsolationForest, forest.is_some()),
            status(ArtifactKind::Scaler, scaler.is_some()),
        ];
        Self {
            lstm,
            forest,
            scaler,
            statuses,
        }
    }

    /// Whether every artifact loaded.
    pub fn all_loaded(&self) -> bool {
        self.lstm.is_some() && self.forest.is_some() && self.scaler.is_some()
    }

    /// Human-readable load errors, in artifact order.
    pub fn load_errors(&self) -> Vec<String> {
        self.statuses
            .iter()
            .filter_map(|s| s.error.as_ref().map(|e| format!("Error loading {}: {e}", s.kind)))
            .collect()
    }
}

fn expect_width(actual: usize, expected: usize) -> Result<(), ModelError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ModelError::ShapeMismatch { expected, actual })
    }
}

fn load_one<T>(
    kind: ArtifactKind,
    path: &Path,
    statuses: &mut Vec<ArtifactStatus>,
    loader: impl FnOnce(&Path) -> Result<T, ModelError>,
) -> Option<T> {
    match loader(path) {
        Ok(handle) => {
            info!(artifact = %kind, path = %path.display(), "✓ Model artifact loaded");
            statuses.push(ArtifactStatus {
                kind,
                path: path.to_path_buf(),
                loaded: true,
                error: None,
            });
            Some(handle)
        }
        Err(e) => {
            error!(artifact = %kind, path = %path.display(), error = %e, "Failed to load model artifact");
            statuses.push(ArtifactStatus {
                kind,
                path: path.to_path_buf(),
                loaded: false,
                error: Some(e.to_string()),
            });
            None
        }
    }
}
