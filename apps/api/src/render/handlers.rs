//! Axum route handlers for the Render API.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::render::RenderFormat;
use crate::state::AppState;

fn default_template() -> String {
    "c-suite".to_string()
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub resume: String,
    /// Accepted for compatibility; does not change the output.
    #[serde(default = "default_template")]
    pub template: String,
}

/// POST /api/v1/render/:format
pub async fn handle_render(
    State(state): State<AppState>,
    Path(format): Path<String>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let format: RenderFormat = format.parse().map_err(AppError::Validation)?;
    render_response(state, request, format).await
}

/// POST /generateDocx
pub async fn handle_generate_docx(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    render_response(state, request, RenderFormat::Structured).await
}

/// POST /generatePdf
pub async fn handle_generate_pdf(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    render_response(state, request, RenderFormat::Paginated).await
}

async fn render_response(
    state: AppState,
    request: RenderRequest,
    format: RenderFormat,
) -> Result<Response, AppError> {
    info!(
        format = format.extension(),
        template = %request.template,
        chars = request.resume.len(),
        "Render requested"
    );

    let renderer = state.renderer.clone();
    let document = tokio::task::spawn_blocking(move || renderer.render(&request.resume, format))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("render task failed: {e}")))??;

    let disposition = HeaderValue::from_str(&format!("attachment; filename={}", document.filename))
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(document.mime_type)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::from(document.bytes),
    )
        .into_response())
}
