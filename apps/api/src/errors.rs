use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::normalize::retry::StructuredError;
use crate::normalize::MalformedResponse;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(#[from] MalformedResponse),

    #[error("Upstream failure: {0}")]
    Upstream(#[from] LlmError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StructuredError> for AppError {
    fn from(err: StructuredError) -> Self {
        match err {
            StructuredError::Upstream(e) => AppError::Upstream(e),
            StructuredError::Malformed { source, .. } => AppError::MalformedResponse(source),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MalformedResponse(e) => {
                tracing::error!(reason = %e.reason, excerpt = %e.excerpt, "Malformed model response");
                (
                    StatusCode::BAD_GATEWAY,
                    "MALFORMED_RESPONSE",
                    "The AI service returned a response that could not be read".to_string(),
                )
            }
            AppError::Upstream(e) => {
                tracing::error!("Upstream LLM error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The AI service is unavailable".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
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
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_maps_to_bad_gateway() {
        let err = AppError::from(StructuredError::Malformed {
            source: MalformedResponse::new("garbage", "expected value"),
            attempts: 2,
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let err = AppError::from(StructuredError::Upstream(LlmError::RateLimited));
        assert!(matches!(err, AppError::Upstream(LlmError::RateLimited)));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = AppError::Validation("jd_text cannot be empty".into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err = AppError::NotFound("Resume x not found".into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
