//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use coursehub_auth::INVALID_CREDENTIALS;
use coursehub_core::error::{AppError, ErrorKind};
use coursehub_media::WebhookError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Set when the same request may succeed if retried.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

/// Wrapper so handlers can return `AppError` with `?`.
///
/// `AppError` lives in `coursehub-core`, so the response impl hangs off this
/// local newtype instead.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, code, message) = match err.kind {
            ErrorKind::Authentication => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                INVALID_CREDENTIALS.to_string(),
            ),
            ErrorKind::Signature => (
                StatusCode::UNAUTHORIZED,
                "INVALID_SIGNATURE",
                "Invalid webhook signature".to_string(),
            ),
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.message),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND", err.message),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT", err.message),
            ErrorKind::Database | ErrorKind::Cache | ErrorKind::ServiceUnavailable => {
                tracing::warn!(kind = %err.kind, error = %err.message, "Backing store unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "SERVICE_UNAVAILABLE",
                    "Service temporarily unavailable".to_string(),
                )
            }
            ErrorKind::Internal | ErrorKind::Configuration | ErrorKind::Serialization => {
                tracing::error!(kind = %err.kind, error = %err.message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = ApiErrorResponse {
            error: code.to_string(),
            message,
            retryable: status == StatusCode::SERVICE_UNAVAILABLE,
        };

        (status, Json(body)).into_response()
    }
}
