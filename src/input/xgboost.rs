use std::path::Path;

use serde::Deserialize;

use crate::input::ArtifactError;
use crate::input::reader::read_json;
use crate::model::{Node, Tree, TreeEnsemble};
use crate::schema::{FEATURE_COUNT, check_order};

// Objectives whose prediction is the raw margin.
const IDENTITY_OBJECTIVES: &[&str] = &[
    "reg:squarederror",
    "reg:linear",
    "reg:absoluteerror",
    "reg:pseudohubererror",
    "reg:quantileerror",
];

#[derive(Debug, Deserialize)]
struct XgbDocument {
    learner: XgbLearner,
    #[serde(default)]
    version: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct XgbLearner {
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: XgbBooster,
    learner_model_param: XgbModelParam,
    #[serde(default)]
    objective: Option<XgbObjective>,
}

#[derive(Debug, Deserialize)]
struct XgbBooster {
    name: String,
    #[serde(default)]
    model: Option<XgbGbtree>,
}

#[derive(Debug, Deserialize)]
struct XgbGbtree {
    trees: Vec<XgbTree>,
}

#[derive(Debug, Deserialize)]
struct XgbTree {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    #[serde(default)]
    default_left: Vec<XgbFlag>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum XgbFlag {
    Bool(bool),
    Int(i64),
}

impl XgbFlag {
    fn is_set(&self) -> bool {
        match self {
            XgbFlag::Bool(b) => *b,
            XgbFlag::Int(i) => *i != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct XgbModelParam {
    base_score: String,
    num_feature: String,
}

#[derive(Debug, Deserialize)]
struct XgbObjective {
    name: String,
}

pub fn load_xgboost(path: &Path) -> Result<TreeEnsemble, ArtifactError> {
    let doc: XgbDocument = read_json(path)?;
    let invalid = |reason: String| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    };
    if !doc.version.is_empty() {
        crate::info!(
            "model {} written by xgboost {}",
            path.display(),
            doc.version
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(".")
        );
    }
    convert_learner(doc.learner).map_err(invalid)
}

fn convert_learner(learner: XgbLearner) -> Result<TreeEnsemble, String> {
    if learner.gradient_booster.name != "gbtree" {
        return Err(format!(
            "unsupported booster {:?}, expected \"gbtree\"",
            learner.gradient_booster.name
        ));
    }
    if let Some(objective) = &learner.objective {
        if !IDENTITY_OBJECTIVES.contains(&objective.name.as_str()) {
            return Err(format!(
                "objective {:?} is not a plain regression objective",
                objective.name
            ));
        }
    }

    let base_score = parse_param_f64(&learner.learner_model_param.base_score)
        .ok_or_else(|| format!("bad base_score {:?}", learner.learner_model_param.base_score))?;
    let n_features: usize = learner
        .learner_model_param
        .num_feature
        .trim()
        .parse()
        .map_err(|_| {
            format!(
                "bad num_feature {:?}",
                learner.learner_model_param.num_feature
            )
        })?;
    if n_features != FEATURE_COUNT {
        return Err(format!(
            "model was trained on {} features, expected {}",
            n_features, FEATURE_COUNT
        ));
    }

    let feature_names = if learner.feature_names.is_empty() {
        None
    } else {
        check_order(&learner.feature_names)?;
        Some(learner.feature_names)
    };

    let raw_trees = learner
        .gradient_booster
        .model
        .map(|m| m.trees)
        .ok_or_else(|| "gbtree booster has no model section".to_string())?;
    let mut trees = Vec::with_capacity(raw_trees.len());
    for (idx, raw) in raw_trees.into_iter().enumerate() {
        trees.push(convert_tree(idx, raw)?);
    }

    TreeEnsemble::new(base_score, n_features, feature_names, trees).map_err(|e| e.to_string())
}

fn convert_tree(idx: usize, raw: XgbTree) -> Result<Tree, String> {
    let n = raw.left_children.len();
    if raw.right_children.len() != n
        || raw.split_indices.len() != n
        || raw.split_conditions.len() != n
        || (!raw.default_left.is_empty() && raw.default_left.len() != n)
    {
        return Err(format!("tree {} has node arrays of unequal length", idx));
    }

    let mut nodes = Vec::with_capacity(n);
    for i in 0..n {
        let left = raw.left_children[i];
        if left == -1 {
            nodes.push(Node::leaf(raw.split_conditions[i]));
            continue;
        }
        let right = raw.right_children[i];
        let feature = raw.split_indices[i];
        if left < 0 || right < 0 || feature < 0 {
            return Err(format!(
                "tree {} node {} has negative child or split index",
                idx, i
            ));
        }
        nodes.push(Node::split(
            feature as usize,
            raw.split_conditions[i],
            left as usize,
            right as usize,
            raw.default_left.get(i).is_none_or(XgbFlag::is_set),
        ));
    }
    Ok(Tree::new(nodes))
}

// Newer writers store scalar params as "[5.6E0]".
pub(crate) fn parse_param_f64(raw: &str) -> Option<f64> {
    let trimmed = raw.trim().trim_start_matches('[').trim_end_matches(']').trim();
    trimmed.parse().ok()
}
