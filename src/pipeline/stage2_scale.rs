use crate::model::{ShapeError, StandardScaler};
use crate::schema::{FeatureVector, ScaledVector};

pub fn run_stage2(
    scaler: &StandardScaler,
    features: &FeatureVector,
) -> Result<ScaledVector, ShapeError> {
    let scaled = scaler.transform(features.values())?;
    Ok(ScaledVector::new(scaled))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_scale.rs"]
mod tests;
