//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pytrace_core::TraceError;
use pytrace_host::{HostError, TraceFailure, TracePhase};

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "VALIDATION_FAILED", "TIMEOUT").
    pub code: String,
    /// Human-readable message, safe to show to the user as-is.
    pub message: String,
    /// Phase of the trace run that failed, when the error came from a run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<TracePhase>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was rejected by the guards (400).
    #[error("{message}")]
    ValidationFailed { message: String, phase: TracePhase },

    /// The runtime failed to compile or run the snippet (422).
    #[error("{message}")]
    ExecutionFailed { message: String, phase: TracePhase },

    /// The runtime's output could not be decoded (502).
    #[error("{message}")]
    ParseFailed { message: String, phase: TracePhase },

    /// The run exceeded its deadline (504).
    #[error("{message}")]
    Timeout { message: String, phase: TracePhase },

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, phase) = match &self {
            ApiError::ValidationFailed { phase, .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED", Some(*phase))
            }
            ApiError::ExecutionFailed { phase, .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "EXECUTION_FAILED", Some(*phase))
            }
            ApiError::ParseFailed { phase, .. } => {
                (StatusCode::BAD_GATEWAY, "PARSE_FAILED", Some(*phase))
            }
            ApiError::Timeout { phase, .. } => {
                (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", Some(*phase))
            }
            ApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
        };

        let detail = ApiErrorDetail {
            code: code.to_string(),
            message: self.to_string(),
            phase,
        };

        let body = serde_json::json!({
            "success": false,
            "error": detail,
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<TraceFailure> for ApiError {
    fn from(failure: TraceFailure) -> Self {
        let message = failure.error.to_string();
        let phase = failure.phase;
        match failure.error {
            TraceError::Validation(_) => ApiError::ValidationFailed { message, phase },
            TraceError::Execution(_) => ApiError::ExecutionFailed { message, phase },
            TraceError::Parse(_) => ApiError::ParseFailed { message, phase },
            TraceError::Timeout(_) => ApiError::Timeout { message, phase },
            TraceError::Unknown(_) => ApiError::InternalError(message),
        }
    }
}

impl From<HostError> for ApiError {
    fn from(err: HostError) -> Self {
        TraceFailure {
            phase: TracePhase::InitializingHost,
            error: err.into(),
        }
        .into()
    }
}
