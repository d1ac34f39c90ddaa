//! Model runtime: loading the serialized classifier and scoring feature vectors.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  loader::load_classifier (startup only)                   │
//! │  - read artifact, SHA-256 checksum                        │
//! │  - parse XGBoost JSON (xgboost.rs)                        │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  forest::TreeEnsemble (immutable, shared via Arc)         │
//! │  - schema checks against the 14-feature layout            │
//! │  - Classifier::predict_proba                              │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod checksum;
pub mod forest;
pub mod loader;
pub mod xgboost;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::models::FeatureVector;

pub use checksum::calculate_checksum;
pub use forest::{RegressionTree, TreeEnsemble};
pub use loader::load_classifier;

/// A loaded, read-only binary classifier.
///
/// Implementations must be safe to share across concurrent requests.
pub trait Classifier: Send + Sync {
    /// Class probabilities `[p(negative), p(positive)]` for one feature vector.
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelInvocationError>;

    /// Descriptive metadata for health reporting.
    fn summary(&self) -> ModelSummary;
}

/// Metadata about the loaded model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub booster: String,
    pub objective: String,
    pub num_trees: usize,
    pub num_features: usize,
    /// SHA-256 of the artifact bytes, when loaded from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Failure while scoring a single request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelInvocationError {
    #[error("model returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Failure while loading the model artifact at startup.
#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse model artifact at '{path}': {message}")]
    Parse { path: String, message: String },
    #[error("unsupported booster '{0}': only gbtree and dart models can be scored")]
    UnsupportedBooster(String),
    #[error("unsupported objective '{0}': expected a binary logistic objective")]
    UnsupportedObjective(String),
    #[error("base_score {0} is not a probability in (0, 1)")]
    InvalidBaseScore(f32),
    #[error("multi-class model with {0} classes cannot serve a binary risk score")]
    MultiClass(i64),
    #[error("model expects {found} features, encoder produces {expected}")]
    FeatureCountMismatch { expected: usize, found: i64 },
    #[error("feature {index} is named '{found}', expected '{expected}'")]
    FeatureNameMismatch {
        index: usize,
        expected: String,
        found: String,
    },
    #[error("model declares {declared} trees but contains {found}")]
    TreeCountMismatch { declared: i64, found: usize },
    #[error("model contains no trees")]
    NoTrees,
    #[error("tree {0} has no nodes")]
    EmptyTree(usize),
    #[error("invalid node index in tree {tree}: node {node} references child {child} but tree has {num_nodes} nodes")]
    InvalidNodeIndex {
        tree: usize,
        node: usize,
        child: i32,
        num_nodes: usize,
    },
    #[error("tree {tree} node {node} splits on feature {feature}, outside the feature schema")]
    InvalidSplitFeature { tree: usize, node: usize, feature: i32 },
    #[error("tree {tree} is malformed: {reason}")]
    MalformedTree { tree: usize, reason: String },
}
