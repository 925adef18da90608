//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("No report available")]
    NoReportAvailable,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Export before any submission bounces back to the entry
            // page instead of rendering an error.
            ApiError::NoReportAvailable => {
                return Redirect::to("/").into_response();
            }
            ApiError::Validation(detail) => (StatusCode::BAD_REQUEST, "VALIDATION", detail.clone()),
            ApiError::Internal(detail) => {
                tracing::error!(%detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => ApiError::Validation(e.to_string()),
            CoreError::NoReportAvailable => ApiError::NoReportAvailable,
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::Report(e) => ApiError::Internal(e.to_string()),
        }
    }
}
