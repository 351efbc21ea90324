use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compliance::AssessmentFailure;
use crate::render::RenderError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Assessment failed: {0}")]
    Assessment(#[from] AssessmentFailure),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut raw_output = None;

        let (status, code, message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
            AppError::Assessment(AssessmentFailure::Transport {
                message,
                timed_out: true,
            }) => {
                tracing::error!("LLM timeout: {message}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "LLM_TIMEOUT",
                    "The AI provider did not respond in time".to_string(),
                )
            }
            AppError::Assessment(AssessmentFailure::Transport { message, .. }) => {
                tracing::error!("LLM transport error: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_TRANSPORT_ERROR",
                    "The AI provider could not be reached".to_string(),
                )
            }
            AppError::Assessment(AssessmentFailure::Upstream { status, message }) => {
                tracing::error!("LLM upstream error (status {status:?}): {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_UPSTREAM_ERROR",
                    "The AI provider reported an error".to_string(),
                )
            }
            AppError::Assessment(AssessmentFailure::Parse(failure)) => {
                raw_output = Some(failure.raw_output);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "LLM_PARSE_FAILURE",
                    format!("The AI response was not a valid assessment: {}", failure.reason),
                )
            }
            AppError::Render(e) => {
                tracing::error!("Render error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "The document could not be rendered".to_string(),
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

        let body = match raw_output {
            Some(raw) => json!({ "error": message, "code": code, "rawOutput": raw }),
            None => json!({ "error": message, "code": code }),
        };

        (status, Json(body)).into_response()
    }
}
