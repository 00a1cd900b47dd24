//! Axum route handlers for the Skills API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::skills::SkillMap;
use crate::skills::approval::{candidates, SkillCandidate};
use crate::skills::extractor::extract_or_empty;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractSkillsRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractSkillsResponse {
    pub skills: SkillMap,
    pub candidates: Vec<SkillCandidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// POST /api/v1/skills/extract
///
/// Extracts skills from a job description and lists them as approval
/// candidates. Extraction failures return an empty list plus a warning.
pub async fn handle_extract_skills(
    State(state): State<AppState>,
    payload: Result<Json<ExtractSkillsRequest>, JsonRejection>,
) -> Result<Json<ExtractSkillsResponse>, AppError> {
    let Json(request) = payload?;
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let extraction = extract_or_empty(state.extractor.as_ref(), &request.job_description).await;

    Ok(Json(ExtractSkillsResponse {
        candidates: candidates(&extraction.skills),
        skills: extraction.skills,
        warning: extraction.warning,
    }))
}
