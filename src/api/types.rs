use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::pipeline::stage1_validate::{FieldError, ValidationError};
use crate::pipeline::stage4_format::PredictionResult;
use crate::schema::FeatureDef;

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub endpoints: EndpointMap,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EndpointMap {
    pub health: String,
    pub model_info: String,
    pub data: String,
    pub predict: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" once artifacts are loaded, "unavailable" otherwise
    pub status: String,
    pub timestamp: String,
    pub server: String,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse {
    pub message: String,
    pub version: String,
    pub status: String,
    pub model_loaded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub model_type: String,
    pub features_count: usize,
    pub required_features: Vec<String>,
    pub features: Vec<FeatureInfo>,
    pub output_range: String,
    pub description: String,
    pub trees: usize,
    pub base_score: f64,
    pub range_policy: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureInfo {
    pub name: String,
    pub description: String,
    pub example: f64,
    pub expected_range: RangeInfo,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RangeInfo {
    pub min: f64,
    pub max: f64,
}

impl From<&FeatureDef> for FeatureInfo {
    fn from(def: &FeatureDef) -> Self {
        Self {
            name: def.name.to_string(),
            description: def.description.to_string(),
            example: def.example,
            expected_range: RangeInfo {
                min: def.range.min,
                max: def.range.max,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_quality: f64,
    pub input_features: Map<String, Value>,
    pub message: String,
}

impl From<PredictionResult> for PredictResponse {
    fn from(result: PredictionResult) -> Self {
        let input_features = result
            .input_features
            .named()
            .map(|(name, v)| (name.to_string(), Value::from(v)))
            .collect();
        Self {
            predicted_quality: result.predicted_quality,
            input_features,
            message: result.message.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FieldErrorBody {
    pub field: String,
    pub reason: String,
}

impl From<&FieldError> for FieldErrorBody {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.clone(),
            reason: err.issue.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub errors: Vec<FieldErrorBody>,
}

impl From<&ValidationError> for ValidationErrorResponse {
    fn from(err: &ValidationError) -> Self {
        Self {
            errors: err.errors.iter().map(FieldErrorBody::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
