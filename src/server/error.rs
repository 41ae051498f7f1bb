//! Error types and response handling for the HTTP API.
//!
//! Provides HTTP status code mapping and JSON error response generation.

use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::generation::{FailureKind, GenerationFailure};
use crate::prompt::ValidationError;
use crate::session::CooldownRejection;

/// Errors returned by `/api/generate`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body could not be decoded into a request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Required input for the mode is missing
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Submitted before the cooldown elapsed
    #[error(transparent)]
    Cooldown(#[from] CooldownRejection),

    /// Non-retryable remote failure, already formatted as "category — message"
    #[error("{0}")]
    Remote(String),

    /// Every attempt was rate limited
    #[error("{0}")]
    RateLimitExhausted(String),
}

impl From<GenerationFailure> for ApiError {
    fn from(failure: GenerationFailure) -> Self {
        match failure.kind {
            FailureKind::Remote(_) => ApiError::Remote(failure.display()),
            FailureKind::Exhausted => ApiError::RateLimitExhausted(failure.display()),
        }
    }
}

impl ApiError {
    /// Map error variant to appropriate HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Cooldown(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Remote(_) => StatusCode::BAD_GATEWAY,
            ApiError::RateLimitExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get error type string for JSON responses
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::Validation(_) => "validation_error",
            ApiError::Cooldown(_) => "cooldown",
            ApiError::Remote(_) => "remote_error",
            ApiError::RateLimitExhausted(_) => "rate_limit_exhausted",
        }
    }

    /// Seconds a client should wait before resubmitting, when known.
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            ApiError::Cooldown(rejection) => Some(rejection.remaining.as_secs_f64().ceil() as u64),
            _ => None,
        }
    }
}

/// Builder for standardized error responses
pub struct ErrorResponse;

impl ErrorResponse {
    /// Create a JSON error response from an ApiError
    pub fn from_error(err: &ApiError, request_id: &str) -> Response {
        let mut error = serde_json::json!({
            "type": err.error_type(),
            "message": err.to_string(),
            "request_id": request_id,
        });

        let mut headers = HeaderMap::new();
        if let Some(seconds) = err.retry_after_seconds() {
            error["retry_after_seconds"] = seconds.into();
            headers.insert(RETRY_AFTER, HeaderValue::from(seconds));
        }

        (
            err.status_code(),
            headers,
            Json(serde_json::json!({ "error": error })),
        )
            .into_response()
    }
}
