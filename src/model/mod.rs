pub mod ensemble;
pub mod scaler;

pub use ensemble::{Node, Tree, TreeEnsemble};
pub use scaler::StandardScaler;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{what}: expected {expected} values, found {found}")]
pub struct ShapeError {
    pub what: &'static str,
    pub expected: usize,
    pub found: usize,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("tree {tree} is empty")]
    EmptyTree { tree: usize },
    #[error("tree {tree} node {node}: child {child} must lie in ({node}, {len})")]
    BadChild {
        tree: usize,
        node: usize,
        child: i64,
        len: usize,
    },
    #[error("tree {tree} node {node}: split feature {feature} >= {n_features}")]
    BadFeature {
        tree: usize,
        node: usize,
        feature: usize,
        n_features: usize,
    },
    #[error("tree {tree} node {node}: non-finite value {value}")]
    NonFinite { tree: usize, node: usize, value: f64 },
    #[error("scaler {field}[{index}] is {value}, expected a finite non-zero number")]
    BadScale {
        field: &'static str,
        index: usize,
        value: f64,
    },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
