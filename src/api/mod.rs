//! HTTP surface of the prediction service.
//!
//! - `GET  /`            - welcome message and endpoint map
//! - `GET  /health`      - readiness; 503 until artifacts are loaded
//! - `GET  /api/info`    - model and feature metadata
//! - `GET  /api/data`    - API version and status
//! - `POST /api/predict` - score one wine sample

pub mod handlers;
pub mod types;

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::pipeline::PredictionService;
use crate::pipeline::stage1_validate::ValidationError;
use handlers::{
    data_handler, health_handler, info_handler, method_not_allowed_handler, not_found_handler,
    predict_handler, root_handler,
};
use types::{ErrorResponse, ValidationErrorResponse};

pub const API_VERSION: &str = "1.0";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Router state. Cloned per request; the artifacts behind the service are
/// shared, never copied.
#[derive(Clone)]
pub struct AppState {
    service: Option<PredictionService>,
    request_timeout: Duration,
}

impl AppState {
    pub fn ready(service: PredictionService) -> Self {
        Self {
            service: Some(service),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// State for a process whose artifacts failed to load.
    pub fn unloaded() -> Self {
        Self {
            service: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn service(&self) -> Option<&PredictionService> {
        self.service.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.service.is_some()
    }
}

#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    NotReady,
    Internal,
    Timeout,
    NotFound,
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(err) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ValidationErrorResponse::from(&err)),
                )
                    .into_response();
            }
            ApiError::NotReady => (StatusCode::SERVICE_UNAVAILABLE, "model not loaded"),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal inference failure",
            ),
            ApiError::Timeout => (StatusCode::SERVICE_UNAVAILABLE, "request timed out"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found"),
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "method not allowed"),
        };
        (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);
    let timeout = state.request_timeout;

    Router::new()
        .route("/", get(root_handler).fallback(method_not_allowed_handler))
        .route(
            "/health",
            get(health_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/api/info",
            get(info_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/api/data",
            get(data_handler).fallback(method_not_allowed_handler),
        )
        .route(
            "/api/predict",
            post(predict_handler).fallback(method_not_allowed_handler),
        )
        .fallback(not_found_handler)
        .layer(middleware::from_fn_with_state(timeout, enforce_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn enforce_timeout(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            crate::warn!("request to {} exceeded {:?}", path, limit);
            ApiError::Timeout.into_response()
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/api/tests.rs"]
mod tests;
