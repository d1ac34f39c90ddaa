//! Compiled tree ensemble used for scoring.

use serde::Serialize;

use super::xgboost::{GradientBooster, Tree, XgbModel};
use super::{Classifier, ModelInvocationError, ModelLoadError, ModelSummary};
use crate::models::{FeatureVector, FEATURE_COUNT, TRAINING_COLUMNS};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        default_left: bool,
        left: usize,
        right: usize,
    },
    Leaf(f32),
}

/// A single regression tree in flat node layout. Node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Compile one XGBoost tree.
    ///
    /// Children must point strictly forward, which rules out cycles and keeps
    /// traversal bounded by the node count.
    pub fn from_xgboost(tree: &Tree, tree_idx: usize) -> Result<Self, ModelLoadError> {
        let num_nodes = usize::try_from(tree.tree_param.num_nodes).unwrap_or(0);
        if num_nodes == 0 {
            return Err(ModelLoadError::EmptyTree(tree_idx));
        }

        let arrays = [
            ("left_children", tree.left_children.len()),
            ("right_children", tree.right_children.len()),
            ("split_indices", tree.split_indices.len()),
            ("split_conditions", tree.split_conditions.len()),
        ];
        for (name, len) in arrays {
            if len != num_nodes {
                return Err(ModelLoadError::MalformedTree {
                    tree: tree_idx,
                    reason: format!("{} has {} entries, expected {}", name, len, num_nodes),
                });
            }
        }
        if tree.split_type.iter().any(|&t| t != 0) {
            return Err(ModelLoadError::MalformedTree {
                tree: tree_idx,
                reason: "categorical splits are not supported".to_string(),
            });
        }

        let mut nodes = Vec::with_capacity(num_nodes);
        for node_idx in 0..num_nodes {
            let left = tree.left_children[node_idx];
            let right = tree.right_children[node_idx];

            if left == -1 {
                nodes.push(Node::Leaf(tree.split_conditions[node_idx]));
                continue;
            }

            for child in [left, right] {
                if child <= node_idx as i32 || child as usize >= num_nodes {
                    return Err(ModelLoadError::InvalidNodeIndex {
                        tree: tree_idx,
                        node: node_idx,
                        child,
                        num_nodes,
                    });
                }
            }

            let feature = tree.split_indices[node_idx];
            if feature < 0 || feature as usize >= FEATURE_COUNT {
                return Err(ModelLoadError::InvalidSplitFeature {
                    tree: tree_idx,
                    node: node_idx,
                    feature,
                });
            }

            nodes.push(Node::Split {
                feature: feature as usize,
                threshold: tree.split_conditions[node_idx],
                default_left: tree.default_left.get(node_idx).copied().unwrap_or(true),
                left: left as usize,
                right: right as usize,
            });
        }

        Ok(Self { nodes })
    }

    /// Leaf value reached by `features`.
    ///
    /// A split sends a row left when `feature < threshold`; NaN follows the
    /// default direction.
    pub fn leaf_value(&self, features: &[f32; FEATURE_COUNT]) -> f32 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    default_left,
                    left,
                    right,
                } => {
                    let x = features[feature];
                    let go_left = if x.is_nan() { default_left } else { x < threshold };
                    idx = if go_left { left } else { right };
                }
            }
        }
    }
}

/// Output link applied to the ensemble margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Link {
    /// `binary:logistic`, `reg:logistic`, `binary:logitraw`
    Logistic,
}

impl Link {
    fn from_objective(name: &str) -> Result<Self, ModelLoadError> {
        match name {
            "binary:logistic" | "reg:logistic" | "binary:logitraw" => Ok(Link::Logistic),
            other => Err(ModelLoadError::UnsupportedObjective(other.to_string())),
        }
    }

    /// Base score (probability space) to margin space.
    fn base_margin(&self, base_score: f32) -> Result<f32, ModelLoadError> {
        match self {
            Link::Logistic => {
                if !(base_score > 0.0 && base_score < 1.0) {
                    return Err(ModelLoadError::InvalidBaseScore(base_score));
                }
                Ok((base_score / (1.0 - base_score)).ln())
            }
        }
    }

    fn apply(&self, margin: f64) -> f64 {
        match self {
            Link::Logistic => 1.0 / (1.0 + (-margin).exp()),
        }
    }
}

/// Gradient-boosted binary classifier.
#[derive(Debug, Clone)]
pub struct TreeEnsemble {
    trees: Vec<RegressionTree>,
    tree_weights: Vec<f32>,
    base_margin: f32,
    link: Link,
    booster: String,
    objective: String,
    checksum: Option<String>,
}

impl TreeEnsemble {
    /// Compile an XGBoost model, checking it against the fixed feature schema.
    pub fn from_xgboost(model: &XgbModel) -> Result<Self, ModelLoadError> {
        let learner = &model.learner;
        let param = &learner.learner_model_param;

        if param.num_class > 1 {
            return Err(ModelLoadError::MultiClass(param.num_class));
        }
        if param.num_feature != FEATURE_COUNT as i64 {
            return Err(ModelLoadError::FeatureCountMismatch {
                expected: FEATURE_COUNT,
                found: param.num_feature,
            });
        }
        if !learner.feature_names.is_empty() {
            if learner.feature_names.len() != FEATURE_COUNT {
                return Err(ModelLoadError::FeatureCountMismatch {
                    expected: FEATURE_COUNT,
                    found: learner.feature_names.len() as i64,
                });
            }
            for (index, (found, expected)) in
                learner.feature_names.iter().zip(TRAINING_COLUMNS).enumerate()
            {
                if found != expected {
                    return Err(ModelLoadError::FeatureNameMismatch {
                        index,
                        expected: expected.to_string(),
                        found: found.clone(),
                    });
                }
            }
        }

        let link = Link::from_objective(&learner.objective.name)?;

        let (model_trees, weight_drop) = match &learner.gradient_booster {
            GradientBooster::Gbtree { model } => (model, None),
            GradientBooster::Dart { gbtree, weight_drop } => (&gbtree.model, Some(weight_drop)),
            other => return Err(ModelLoadError::UnsupportedBooster(other.name().to_string())),
        };

        let declared = model_trees.gbtree_model_param.num_trees;
        if declared != model_trees.trees.len() as i64 {
            return Err(ModelLoadError::TreeCountMismatch {
                declared,
                found: model_trees.trees.len(),
            });
        }
        if model_trees.trees.is_empty() {
            return Err(ModelLoadError::NoTrees);
        }
        if !model_trees.tree_info.is_empty() {
            if model_trees.tree_info.len() != model_trees.trees.len() {
                return Err(ModelLoadError::TreeCountMismatch {
                    declared: model_trees.tree_info.len() as i64,
                    found: model_trees.trees.len(),
                });
            }
            // Binary models have a single output group.
            if let Some((tree, group)) = model_trees
                .tree_info
                .iter()
                .enumerate()
                .find(|(_, group)| **group != 0)
            {
                return Err(ModelLoadError::MalformedTree {
                    tree,
                    reason: format!("assigned to output group {}, expected 0", group),
                });
            }
        }
        if let Some(weights) = weight_drop {
            if weights.len() != model_trees.trees.len() {
                return Err(ModelLoadError::TreeCountMismatch {
                    declared: weights.len() as i64,
                    found: model_trees.trees.len(),
                });
            }
        }

        let trees = model_trees
            .trees
            .iter()
            .enumerate()
            .map(|(idx, tree)| RegressionTree::from_xgboost(tree, idx))
            .collect::<Result<Vec<_>, _>>()?;

        let tree_weights = match weight_drop {
            Some(weights) => weights.clone(),
            None => vec![1.0; trees.len()],
        };

        Ok(Self {
            trees,
            tree_weights,
            base_margin: link.base_margin(param.base_score)?,
            link,
            booster: learner.gradient_booster.name().to_string(),
            objective: learner.objective.name.clone(),
            checksum: None,
        })
    }

    /// Build directly from compiled trees. Each tree has weight 1.
    pub fn from_trees(
        trees: Vec<RegressionTree>,
        base_score: f32,
    ) -> Result<Self, ModelLoadError> {
        let link = Link::Logistic;
        Ok(Self {
            tree_weights: vec![1.0; trees.len()],
            trees,
            base_margin: link.base_margin(base_score)?,
            link,
            booster: "gbtree".to_string(),
            objective: "binary:logistic".to_string(),
            checksum: None,
        })
    }

    /// Attach the artifact checksum reported in the model summary.
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = Some(checksum.into());
        self
    }

    /// Raw additive score before the link function.
    pub fn margin(&self, features: &[f32; FEATURE_COUNT]) -> f64 {
        let sum: f64 = self
            .trees
            .iter()
            .zip(&self.tree_weights)
            .map(|(tree, weight)| f64::from(tree.leaf_value(features) * weight))
            .sum();
        f64::from(self.base_margin) + sum
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Classifier for TreeEnsemble {
    fn predict_proba(&self, features: &FeatureVector) -> Result<[f64; 2], ModelInvocationError> {
        // XGBoost evaluates splits in single precision.
        let row = features.to_array().map(|v| v as f32);
        let p = self.link.apply(self.margin(&row));
        if !p.is_finite() || !(0.0..=1.0).contains(&p) {
            return Err(ModelInvocationError::MalformedOutput(format!(
                "probability {} outside [0, 1]",
                p
            )));
        }
        Ok([1.0 - p, p])
    }

    fn summary(&self) -> ModelSummary {
        ModelSummary {
            booster: self.booster.clone(),
            objective: self.objective.clone(),
            num_trees: self.num_trees(),
            num_features: FEATURE_COUNT,
            checksum: self.checksum.clone(),
        }
    }
}
