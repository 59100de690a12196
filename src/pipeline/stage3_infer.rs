use crate::model::{ShapeError, TreeEnsemble};
use crate::schema::ScaledVector;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("regressor produced non-finite score {0}")]
    NonFinite(f64),
}

pub fn run_stage3(regressor: &TreeEnsemble, scaled: &ScaledVector) -> Result<f64, InferenceError> {
    let score = regressor.predict(scaled.values())?;
    if !score.is_finite() {
        return Err(InferenceError::NonFinite(score));
    }
    Ok(score)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_infer.rs"]
mod tests;
