use crate::model::{ModelError, ShapeError};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf {
        value: f64,
    },
}

impl Node {
    pub fn split(
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        default_left: bool,
    ) -> Self {
        Node::Split {
            feature,
            threshold,
            left,
            right,
            default_left,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Node::Leaf { value }
    }
}

/// A single regression tree stored as a flat node array rooted at index 0.
///
/// Children always sit at a higher index than their parent, so traversal
/// terminates after at most `nodes.len()` steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::EmptyTree { tree });
        }
        let len = self.nodes.len();
        for (node, n) in self.nodes.iter().enumerate() {
            match *n {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    for child in [left, right] {
                        if child <= node || child >= len {
                            return Err(ModelError::BadChild {
                                tree,
                                node,
                                child: child as i64,
                                len,
                            });
                        }
                    }
                    if feature >= n_features {
                        return Err(ModelError::BadFeature {
                            tree,
                            node,
                            feature,
                            n_features,
                        });
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::NonFinite {
                            tree,
                            node,
                            value: threshold,
                        });
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(ModelError::NonFinite { tree, node, value });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn leaf_value(&self, x: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let v = x[feature];
                    // Split conditions are stored and compared as f32.
                    let go_left = if v.is_nan() {
                        default_left
                    } else {
                        (v as f32) < (threshold as f32)
                    };
                    idx = if go_left { left } else { right };
                }
            }
        }
    }
}

/// Additive tree ensemble: `base_score + sum(tree leaf values)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    base_score: f64,
    n_features: usize,
    feature_names: Option<Vec<String>>,
    trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn new(
        base_score: f64,
        n_features: usize,
        feature_names: Option<Vec<String>>,
        trees: Vec<Tree>,
    ) -> Result<Self, ModelError> {
        if !base_score.is_finite() {
            return Err(ModelError::NonFinite {
                tree: 0,
                node: 0,
                value: base_score,
            });
        }
        if let Some(names) = &feature_names {
            if names.len() != n_features {
                return Err(ShapeError {
                    what: "model feature names",
                    expected: n_features,
                    found: names.len(),
                }
                .into());
            }
        }
        for (idx, tree) in trees.iter().enumerate() {
            tree.validate(idx, n_features)?;
        }
        Ok(Self {
            base_score,
            n_features,
            feature_names,
            trees,
        })
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    pub fn predict(&self, x: &[f64]) -> Result<f64, ShapeError> {
        if x.len() != self.n_features {
            return Err(ShapeError {
                what: "model input",
                expected: self.n_features,
                found: x.len(),
            });
        }
        let mut sum = 0.0f64;
        for tree in &self.trees {
            sum += tree.leaf_value(x);
        }
        Ok(self.base_score + sum)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/ensemble.rs"]
mod tests;
