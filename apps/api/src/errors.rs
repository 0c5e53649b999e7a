use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::jobs::cache::CacheError;
use crate::jobs::JobSourceError;
use crate::recommendation::RecommendError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Recommendation error: {0}")]
    Recommendation(#[from] RecommendError),

    #[error("Job source error: {0}")]
    JobSource(#[from] JobSourceError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Recommendation(e @ RecommendError::EmptyProfile) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_PROFILE",
                e.to_string(),
            ),
            AppError::Recommendation(e @ RecommendError::EmptyCorpus { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_CORPUS",
                e.to_string(),
            ),
            AppError::Recommendation(e @ RecommendError::InvalidConfig(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_CONFIG", e.to_string())
            }
            AppError::Recommendation(e @ RecommendError::Vectorization { .. }) => {
                tracing::error!("Vectorization invariant violated: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "VECTORIZATION_ERROR",
                    "An internal ranking error occurred".to_string(),
                )
            }
            AppError::JobSource(JobSourceError::NotConfigured(msg)) => {
                tracing::error!("Job source not configured: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "JOB_SOURCE_UNAVAILABLE",
                    "Job search is not configured".to_string(),
                )
            }
            AppError::JobSource(e) => {
                tracing::error!("Job source error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "JOB_SOURCE_ERROR",
                    "The job listing provider failed".to_string(),
                )
            }
            AppError::Cache(e) => {
                tracing::error!("Cache error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CACHE_ERROR",
                    "A cache error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
