use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::api::types::{
    DataResponse, EndpointMap, FeatureInfo, HealthResponse, InfoResponse, PredictResponse,
    RootResponse,
};
use crate::api::{API_VERSION, ApiError, AppState};
use crate::pipeline::PredictionError;
use crate::pipeline::stage1_validate::{FieldIssue, ValidationError};
use crate::schema::{builtin_features, expected_field_count, field_order};

const MODEL_TYPE: &str = "XGBoost Regressor";
const OUTPUT_RANGE: &str = "3-8 (wine quality score)";
const DESCRIPTION: &str = "Predicts wine quality based on physicochemical properties";

pub(crate) async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Welcome to Wine Quality API!".to_string(),
        endpoints: EndpointMap {
            health: "/health".to_string(),
            model_info: "/api/info".to_string(),
            data: "/api/data".to_string(),
            predict: "/api/predict".to_string(),
        },
    })
}

pub(crate) async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let ready = state.is_ready();
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            status: if ready { "healthy" } else { "unavailable" }.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            server: "running".to_string(),
            model_loaded: ready,
            scaler_loaded: ready,
        }),
    )
}

pub(crate) async fn data_handler(State(state): State<AppState>) -> Json<DataResponse> {
    Json(DataResponse {
        message: "Wine Quality API".to_string(),
        version: API_VERSION.to_string(),
        status: "running".to_string(),
        model_loaded: state.is_ready(),
    })
}

pub(crate) async fn info_handler(
    State(state): State<AppState>,
) -> Result<Json<InfoResponse>, ApiError> {
    let service = state.service().ok_or(ApiError::NotReady)?;
    let regressor = &service.artifacts().regressor;
    Ok(Json(InfoResponse {
        model_type: MODEL_TYPE.to_string(),
        features_count: expected_field_count(),
        required_features: field_order().map(str::to_string).collect(),
        features: builtin_features().iter().map(FeatureInfo::from).collect(),
        output_range: OUTPUT_RANGE.to_string(),
        description: DESCRIPTION.to_string(),
        trees: regressor.n_trees(),
        base_score: regressor.base_score(),
        range_policy: service.policy().as_str().to_string(),
    }))
}

pub(crate) async fn predict_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<PredictResponse>, ApiError> {
    let service = state.service().ok_or(ApiError::NotReady)?;
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        ApiError::Validation(ValidationError::body(FieldIssue::Malformed(e.to_string())))
    })?;

    let start = Instant::now();
    match service.predict(&payload) {
        Ok(result) => {
            ::tracing::debug!(
                score = result.raw_score,
                elapsed_us = start.elapsed().as_micros() as u64,
                "prediction served"
            );
            Ok(Json(PredictResponse::from(result)))
        }
        Err(PredictionError::InvalidInput(err)) => {
            crate::info!("rejected prediction request: {}", err);
            Err(ApiError::Validation(err))
        }
        Err(PredictionError::Inference(err)) => {
            crate::error!("inference failed: {}", err);
            Err(ApiError::Internal)
        }
    }
}

pub(crate) async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}

pub(crate) async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
