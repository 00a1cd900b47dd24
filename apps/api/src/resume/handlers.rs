//! Axum route handlers for the Resume API.

use std::collections::HashSet;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::artifacts::ArtifactInfo;
use crate::errors::AppError;
use crate::models::resume::ResumeSections;
use crate::models::skills::{SkillId, SkillMap};
use crate::resume::export::ExportFormat;
use crate::resume::merge::Addition;
use crate::resume::parser::ResumeFormat;
use crate::resume::pipeline::{enhance_resume, parse_resume, EnhanceRequest, UploadedResume};
use crate::scoring::ScoreComparison;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SectionsResponse {
    pub format: ResumeFormat,
    pub sections: ResumeSections,
}

#[derive(Debug, Serialize)]
pub struct DownloadLink {
    #[serde(flatten)]
    pub artifact: ArtifactInfo,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct EnhanceResponse {
    pub format: ResumeFormat,
    pub sections: ResumeSections,
    pub approved: SkillMap,
    pub additions: Vec<Addition>,
    pub ats_score_old: f64,
    pub ats_score_new: f64,
    pub scores: ScoreComparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub download: DownloadLink,
}

/// Multipart fields accepted by the resume endpoints.
#[derive(Debug, Default)]
struct ResumeForm {
    resume: Option<UploadedResume>,
    job_description: Option<String>,
    skills: Option<SkillMap>,
    approved: Vec<SkillId>,
    format: ExportFormat,
}

async fn read_resume_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "resume" => {
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::Validation("resume field must be a file upload".to_string())
                    })?;
                let bytes = field.bytes().await?;
                form.resume = Some(UploadedResume { filename, bytes });
            }
            "job_description" => form.job_description = Some(field.text().await?),
            "skills" => {
                let raw = field.text().await?;
                let skills = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Validation(format!(
                        "skills must be a JSON object of section -> skills: {e}"
                    ))
                })?;
                form.skills = Some(skills);
            }
            "approved" => {
                let raw = field.text().await?;
                form.approved = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Validation(format!(
                        "approved must be a JSON array of skill ids: {e}"
                    ))
                })?;
            }
            "format" => {
                form.format = field.text().await?.parse().map_err(AppError::Validation)?;
            }
            other => {
                tracing::debug!("Ignoring unknown multipart field '{other}'");
            }
        }
    }

    Ok(form)
}

fn required_resume(form: &mut ResumeForm) -> Result<UploadedResume, AppError> {
    form.resume
        .take()
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/sections
///
/// Parses an uploaded resume and returns its detected sections.
pub async fn handle_preview_sections(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<SectionsResponse>, AppError> {
    let mut form = read_resume_form(multipart?).await?;
    let resume = required_resume(&mut form)?;
    let parsed = parse_resume(&resume).await?;

    Ok(Json(SectionsResponse {
        format: parsed.format,
        sections: parsed.sections,
    }))
}

/// POST /api/v1/resumes/enhance
///
/// Single request/response enhancement: resume + job description + approved
/// skill ids in, merged sections + before/after ATS scores + download out.
pub async fn handle_enhance(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<EnhanceResponse>, AppError> {
    let mut form = read_resume_form(multipart?).await?;
    let resume = required_resume(&mut form)?;
    let job_description = form
        .job_description
        .take()
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    let request = EnhanceRequest {
        resume,
        job_description,
        extracted: form.skills.take(),
        approved: form.approved.drain(..).collect::<HashSet<_>>(),
        format: form.format,
    };

    let outcome = enhance_resume(state.extractor.as_ref(), request).await?;
    let artifact = state.artifacts.store(&outcome.document).await?;
    info!("Enhanced resume ready for download: {}", artifact.id);

    Ok(Json(EnhanceResponse {
        format: outcome.source_format,
        sections: outcome.merged.sections,
        approved: outcome.approved,
        additions: outcome.merged.additions,
        ats_score_old: outcome.scores.before,
        ats_score_new: outcome.scores.after,
        scores: outcome.scores,
        warning: outcome.warning,
        download: DownloadLink {
            url: format!("/api/v1/downloads/{}", artifact.id),
            artifact,
        },
    }))
}

/// GET /api/v1/downloads/:id
///
/// Ids that are not UUIDs are treated like any other unknown id.
pub async fn handle_download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::NotFound(format!("Download {id} not found or expired")))?;
    let (artifact, bytes) = state
        .artifacts
        .fetch(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Download {id} not found or expired")))?;

    Ok((
        [
            (header::CONTENT_TYPE, artifact.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
