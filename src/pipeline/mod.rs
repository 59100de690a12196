pub mod stage1_validate;
pub mod stage2_scale;
pub mod stage3_infer;
pub mod stage4_format;

use std::sync::Arc;

use serde_json::Value;

use crate::input::ModelArtifacts;
use crate::schema::RangePolicy;
use stage1_validate::{ValidationError, run_stage1};
use stage2_scale::run_stage2;
use stage3_infer::{InferenceError, run_stage3};
use stage4_format::{PredictionResult, run_stage4};

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
    #[error("inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// validate -> scale -> predict -> format over shared, read-only artifacts.
#[derive(Debug, Clone)]
pub struct PredictionService {
    artifacts: Arc<ModelArtifacts>,
    policy: RangePolicy,
}

impl PredictionService {
    pub fn new(artifacts: Arc<ModelArtifacts>, policy: RangePolicy) -> Self {
        Self { artifacts, policy }
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    pub fn predict(&self, body: &Value) -> Result<PredictionResult, PredictionError> {
        let stage1 = run_stage1(body, self.policy)?;
        for warning in &stage1.warnings {
            crate::warn!("accepting {:?}: {}", warning.field, warning.issue);
        }
        let scaled = run_stage2(&self.artifacts.scaler, &stage1.features)
            .map_err(InferenceError::from)?;
        let score = run_stage3(&self.artifacts.regressor, &scaled)?;
        Ok(run_stage4(score, stage1.features))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/tests.rs"]
mod tests;
