use std::path::{Path, PathBuf};

pub mod reader;
pub mod scaler_file;
pub mod xgboost;

use scaler_file::load_scaler;
use xgboost::load_xgboost;

use crate::model::{StandardScaler, TreeEnsemble};

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed artifact {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("incompatible artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// Fitted scaler and regressor. Built once at startup and never mutated.
#[derive(Debug)]
pub struct ModelArtifacts {
    pub scaler: StandardScaler,
    pub regressor: TreeEnsemble,
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
}

pub fn load_artifacts(
    scaler_path: &Path,
    model_path: &Path,
) -> Result<ModelArtifacts, ArtifactError> {
    crate::info!(
        "loading artifacts: scaler={}, model={}",
        scaler_path.display(),
        model_path.display()
    );

    let scaler = load_scaler(scaler_path)?;
    let regressor = load_xgboost(model_path)?;

    if scaler.n_features() != regressor.n_features() {
        return Err(ArtifactError::Invalid {
            path: model_path.to_path_buf(),
            reason: format!(
                "model expects {} features but scaler produces {}",
                regressor.n_features(),
                scaler.n_features()
            ),
        });
    }

    crate::info!(
        "artifacts loaded: {} trees, base_score={}",
        regressor.n_trees(),
        regressor.base_score()
    );

    Ok(ModelArtifacts {
        scaler,
        regressor,
        scaler_path: scaler_path.to_path_buf(),
        model_path: model_path.to_path_buf(),
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
