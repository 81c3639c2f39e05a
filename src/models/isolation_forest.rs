//! Isolation forest anomaly scoring.
//!
//! Each tree isolates a sample by recursive axis-aligned splits. Anomalies
//! isolate in fewer splits, so a short mean path length means "anomalous".
//!
//! ```text
//! h(x)     = depth(leaf) + c(leaf_samples)
//! s(x)     = -2 ^ (-mean_h(x) / c(max_samples))
//! score(x) = s(x) - offset
//! ```
//!
//! With the default `offset = -0.5`, scores below zero flag anomalies.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{check_width, read_json, ModelError};

/// Euler-Mascheroni constant.
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Average path length of an unsuccessful search in a binary search tree
/// built from `n` samples.
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// Go left when `x[feature] <= threshold`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        n_samples: usize,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationTree {
    /// Node 0 is the root. Children always have a larger index than their parent.
    pub nodes: Vec<TreeNode>,
}

impl IsolationTree {
    fn validate(&self, n_features: usize, idx: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {idx} has no nodes")));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                if *feature >= n_features {
                    return Err(ModelError::Invalid(format!(
                        "tree {idx} node {i} splits on feature {feature}, model has {n_features}"
                    )));
                }
                if !threshold.is_finite() {
                    return Err(ModelError::Invalid(format!(
                        "tree {idx} node {i} has a non-finite threshold"
                    )));
                }
                for child in [*left, *right] {
                    if child <= i || child >= self.nodes.len() {
                        return Err(ModelError::Invalid(format!(
                            "tree {idx} node {i} has invalid child index {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Isolation depth of `x`, including the expected remaining depth at the leaf.
    pub fn path_length(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { n_samples } => return depth + average_path_length(*n_samples),
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if x[*feature] <= *threshold { *left } else { *right };
                    depth += 1.0;
                }
            }
        }
    }
}

const fn default_offset() -> f64 {
    -0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    pub n_features: usize,
    /// Subsample size each tree was grown on.
    pub max_samples: usize,
    /// Decision threshold subtracted from the raw score.
    #[serde(default = "default_offset")]
    pub offset: f64,
    pub trees: Vec<IsolationTree>,
}

impl IsolationForest {
    pub fn new(n_features: usize, max_samples: usize, offset: f64, trees: Vec<IsolationTree>) -> Result<Self, ModelError> {
        let forest = Self {
            n_features,
            max_samples,
            offset,
            trees,
        };
        forest.validate()?;
        Ok(forest)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let forest: Self = read_json(path)?;
        forest.validate()?;
        Ok(forest)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("isolation forest has no trees".into()));
        }
        if self.max_samples < 2 {
            return Err(ModelError::Invalid(format!(
                "max_samples must be >= 2, got {}",
                self.max_samples
            )));
        }
        if !self.offset.is_finite() {
            return Err(ModelError::Invalid("offset must be finite".into()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, idx)?;
        }
        Ok(())
    }

    /// Mean isolation depth across all trees.
    pub fn mean_path_length(&self, x: &[f64]) -> Result<f64, ModelError> {
        check_width(self.n_features, x)?;
        let total: f64 = self.trees.iter().map(|t| t.path_length(x)).sum();
        Ok(total / self.trees.len() as f64)
    }

    /// Raw score in `[-1, 0)`; closer to -1 is more abnormal.
    pub fn score_sample(&self, x: &[f64]) -> Result<f64, ModelError> {
        let depth = self.mean_path_length(x)?;
        Ok(-(2.0_f64).powf(-depth / average_path_length(self.max_samples)))
    }

    /// Signed anomaly score; negative means anomalous.
    pub fn decision_function(&self, x: &[f64]) -> Result<f64, ModelError> {
        let score = self.score_sample(x)? - self.offset;
        if score.is_finite() {
            Ok(score)
        } else {
            Err(ModelError::NonFinite)
        }
    }
}
