//! Serde definitions for the XGBoost JSON model format.
//!
//! Only the parts needed to score a binary tree ensemble are modelled; unknown
//! fields are ignored. XGBoost writes many scalars as strings (`"14"`, `"5E-1"`,
//! `"[5E-1]"`), so those go through lenient deserializers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Parse a scalar that may be a number, a stringified number, a one-element
/// array, or a bracketed string like `"[5E-1]"`.
fn deserialize_lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    let mut cur = Value::deserialize(deserializer)?;
    loop {
        match cur {
            Value::Number(n) => {
                return n
                    .as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| SerdeError::custom("invalid number"));
            }
            Value::String(s) => {
                let t = s.trim();
                if let Ok(f) = t.parse::<f32>() {
                    return Ok(f);
                }
                if let Some(inner) = t.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
                    if let Ok(f) = inner.trim().parse::<f32>() {
                        return Ok(f);
                    }
                }
                return Err(SerdeError::custom(format!(
                    "cannot parse number from string: {}",
                    s
                )));
            }
            Value::Array(arr) => match arr.into_iter().next() {
                Some(first) => cur = first,
                None => return Err(SerdeError::custom("empty array")),
            },
            _ => return Err(SerdeError::custom("expected number, string, or array")),
        }
    }
}

/// Parse a list of flags written as booleans or 0/1 integers.
fn deserialize_flags<'de, D>(deserializer: D) -> Result<Vec<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as SerdeError;

    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|value| match value {
            Value::Bool(b) => Ok(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(i != 0),
                None => Err(SerdeError::custom(format!("invalid flag: {}", n))),
            },
            other => Err(SerdeError::custom(format!("invalid flag: {}", other))),
        })
        .collect()
}

fn default_one() -> i64 {
    1
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeParam {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub num_nodes: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default)]
    pub num_feature: i64,
}

/// One regression tree in XGBoost's array-of-fields layout.
///
/// Node `i` is a leaf when `left_children[i] == -1`; its value is then stored in
/// `split_conditions[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub tree_param: TreeParam,
    #[serde(default)]
    pub id: i32,
    pub left_children: Vec<i32>,
    pub right_children: Vec<i32>,
    pub split_indices: Vec<i32>,
    pub split_conditions: Vec<f32>,
    #[serde(default, deserialize_with = "deserialize_flags")]
    pub default_left: Vec<bool>,
    #[serde(default)]
    pub split_type: Vec<i32>,
    #[serde(default)]
    pub base_weights: Vec<f32>,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GBTreeModelParam {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub num_trees: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelTrees {
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub tree_info: Vec<i32>,
    pub gbtree_model_param: GBTreeModelParam,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GBTreeDefinition {
    pub model: ModelTrees,
}

/// Booster variants written by XGBoost.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum GradientBooster {
    Gbtree {
        model: ModelTrees,
    },
    Dart {
        gbtree: GBTreeDefinition,
        weight_drop: Vec<f32>,
    },
    Gblinear {
        #[serde(default)]
        model: Value,
    },
}

impl GradientBooster {
    pub fn name(&self) -> &'static str {
        match self {
            GradientBooster::Gbtree { .. } => "gbtree",
            GradientBooster::Dart { .. } => "dart",
            GradientBooster::Gblinear { .. } => "gblinear",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub name: String,
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerModelParam {
    /// Stored in probability space for logistic objectives.
    #[serde(deserialize_with = "deserialize_lenient_f32")]
    pub base_score: f32,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[serde(default = "default_one")]
    pub num_class: i64,
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub num_feature: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Learner {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub gradient_booster: GradientBooster,
    pub objective: Objective,
    pub learner_model_param: LearnerModelParam,
}

/// Top-level XGBoost JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XgbModel {
    #[serde(default)]
    pub version: Vec<u32>,
    pub learner: Learner,
}

impl XgbModel {
    /// Parse from JSON bytes, reporting the JSON path of the first bad field.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_path_to_error::Error<serde_json::Error>> {
        let deserializer = &mut serde_json::Deserializer::from_slice(bytes);
        serde_path_to_error::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_score_parses_number_string_array_and_bracketed() {
        for value in [json!(0.5), json!("0.5"), json!([0.5]), json!("[5E-1]")] {
            let v = json!({"base_score": value, "num_class": "0", "num_feature": "14"});
            let param: LearnerModelParam = serde_json::from_value(v).unwrap();
            assert_eq!(param.base_score, 0.5);
            assert_eq!(param.num_feature, 14);
        }
    }

    #[test]
    fn base_score_rejects_garbage() {
        let v = json!({"base_score": "half", "num_class": "0", "num_feature": "14"});
        assert!(serde_json::from_value::<LearnerModelParam>(v).is_err());
    }

    #[test]
    fn integer_params_accept_numbers_and_strings() {
        let v = json!({"base_score": 0.5, "num_class": 0, "num_feature": "14"});
        let param: LearnerModelParam = serde_json::from_value(v).unwrap();
        assert_eq!(param.num_class, 0);
        assert_eq!(param.num_feature, 14);

        let v = json!({"base_score": 0.5, "num_feature": 14});
        let param: LearnerModelParam = serde_json::from_value(v).unwrap();
        assert_eq!(param.num_class, 1);

        let v = json!({"num_trees": "3"});
        let param: GBTreeModelParam = serde_json::from_value(v).unwrap();
        assert_eq!(param.num_trees, 3);

        let v = json!({"base_score": 0.5, "num_feature": "fourteen"});
        assert!(serde_json::from_value::<LearnerModelParam>(v).is_err());
    }

    #[test]
    fn default_left_accepts_ints_and_bools() {
        let tree = json!({
            "tree_param": {"num_nodes": "3", "num_feature": "14"},
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "split_indices": [7, 0, 0],
            "split_conditions": [25.0, -0.1, 0.2],
            "default_left": [1, 0, false]
        });
        let tree: Tree = serde_json::from_value(tree).unwrap();
        assert_eq!(tree.default_left, vec![true, false, false]);
        assert_eq!(tree.tree_param.num_nodes, 3);
    }

    #[test]
    fn booster_tag_selects_variant() {
        let booster = json!({"name": "gblinear", "model": {"weights": [0.1]}});
        let booster: GradientBooster = serde_json::from_value(booster).unwrap();
        assert_eq!(booster.name(), "gblinear");
    }

    #[test]
    fn parse_errors_carry_json_path() {
        let doc = br#"{"learner": {"gradient_booster": {"name": "gbtree", "model": {}},
            "objective": {"name": "binary:logistic"},
            "learner_model_param": {"base_score": "5E-1", "num_feature": "14"}}}"#;
        let err = XgbModel::from_slice(doc).unwrap_err();
        assert!(err.path().to_string().starts_with("learner.gradient_booster"));
    }
}
