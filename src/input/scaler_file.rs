use std::path::Path;

use serde::Deserialize;

use crate::input::ArtifactError;
use crate::input::reader::read_json;
use crate::model::StandardScaler;
use crate::schema::{FEATURE_COUNT, check_order};

/// JSON export of a fitted standard scaler. Attribute names follow the
/// fitted-estimator convention, with or without the trailing underscore.
#[derive(Debug, Deserialize)]
struct ScalerFile {
    #[serde(default, alias = "feature_names_in_")]
    feature_names_in: Option<Vec<String>>,
    #[serde(alias = "mean_")]
    mean: Vec<f64>,
    #[serde(alias = "scale_")]
    scale: Vec<f64>,
}

pub fn load_scaler(path: &Path) -> Result<StandardScaler, ArtifactError> {
    let file: ScalerFile = read_json(path)?;
    let invalid = |reason: String| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    };

    if file.mean.len() != FEATURE_COUNT {
        return Err(invalid(format!(
            "scaler was fitted on {} features, expected {}",
            file.mean.len(),
            FEATURE_COUNT
        )));
    }
    if let Some(names) = &file.feature_names_in {
        check_order(names).map_err(&invalid)?;
    }

    StandardScaler::new(file.mean, file.scale).map_err(|e| invalid(e.to_string()))
}
