//! Axum route handlers for the Compliance API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::compliance::validator::ComplianceResult;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessRequest {
    pub resume: String,
    pub job_description: String,
}

/// POST /api/v1/compliance/assess (also POST /checkCompliance)
///
/// Scores a resume against a job description. Parse failures come back as 422
/// with the raw model output attached.
pub async fn handle_assess(
    State(state): State<AppState>,
    Json(request): Json<AssessRequest>,
) -> Result<Json<ComplianceResult>, AppError> {
    let result = state
        .assessor
        .assess(&request.resume, &request.job_description)
        .await?;

    Ok(Json(result))
}
