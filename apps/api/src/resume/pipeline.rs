//! Resume enhancement: orchestrates one request end to end.
//!
//! Flow: detect format → extract text → split sections → extract skills
//!       (unless supplied) → approve → merge → score → export.
//!
//! Extraction failures do not abort the run; they surface as a warning and the
//! resume is exported without additions.

use std::collections::HashSet;

use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::resume::ResumeSections;
use crate::models::skills::{SkillId, SkillMap};
use crate::resume::export::{export, ExportFormat, ExportedDocument};
use crate::resume::merge::{merge_skills, MergedResume};
use crate::resume::parser::{extract_text_blocking, ResumeFormat};
use crate::resume::sections::split_sections;
use crate::scoring::ScoreComparison;
use crate::skills::approval::approve;
use crate::skills::extractor::{extract_or_empty, Extraction, SkillExtractor};

/// An uploaded resume file.
#[derive(Debug, Clone)]
pub struct UploadedResume {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub struct EnhanceRequest {
    pub resume: UploadedResume,
    pub job_description: String,
    /// Skills extracted by an earlier call. When absent, extraction runs here.
    pub extracted: Option<SkillMap>,
    pub approved: HashSet<SkillId>,
    pub format: ExportFormat,
}

#[derive(Debug)]
pub struct EnhanceOutcome {
    pub source_format: ResumeFormat,
    pub extracted: SkillMap,
    pub approved: SkillMap,
    pub merged: MergedResume,
    pub scores: ScoreComparison,
    pub warning: Option<String>,
    pub document: ExportedDocument,
}

/// Parsed view of an upload, shared by the preview and enhance endpoints.
#[derive(Debug)]
pub struct ParsedResume {
    pub format: ResumeFormat,
    pub text: String,
    pub sections: ResumeSections,
}

/// Detects the format, extracts text and splits it into sections.
pub async fn parse_resume(resume: &UploadedResume) -> Result<ParsedResume, AppError> {
    let format = ResumeFormat::from_filename(&resume.filename).ok_or_else(|| {
        AppError::UnsupportedFileType(format!(
            "'{}' is not a .pdf or .docx file",
            resume.filename
        ))
    })?;

    let text = extract_text_blocking(format, resume.bytes.clone()).await?;
    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "Unable to extract text from the resume. Please check the file format.".to_string(),
        ));
    }

    let sections = split_sections(&text);
    debug!(
        "Parsed {} ({:?}): {} chars, {} sections",
        resume.filename,
        format,
        text.len(),
        sections.len()
    );

    Ok(ParsedResume {
        format,
        text,
        sections,
    })
}

pub async fn enhance_resume(
    extractor: &dyn SkillExtractor,
    request: EnhanceRequest,
) -> Result<EnhanceOutcome, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let parsed = parse_resume(&request.resume).await?;

    let Extraction { skills, warning } = match request.extracted {
        Some(skills) => Extraction {
            skills,
            warning: None,
        },
        None => extract_or_empty(extractor, &request.job_description).await,
    };

    let approved = approve(&skills, &request.approved);
    let merged = merge_skills(parsed.sections, &approved);

    let scores = ScoreComparison::compute(
        &request.job_description,
        &parsed.text,
        &merged.sections.flatten(),
    );

    info!(
        "Enhanced {}: {} of {} skills approved, ATS {:.2} -> {:.2}",
        request.resume.filename,
        approved.skill_count(),
        skills.skill_count(),
        scores.before,
        scores.after
    );

    let format = request.format;
    let source_format = parsed.format;
    let original = request.resume.bytes;
    let to_export = merged.clone();
    let document =
        tokio::task::spawn_blocking(move || export(format, source_format, &original, &to_export))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("export task failed: {e}")))??;

    Ok(EnhanceOutcome {
        source_format,
        extracted: skills,
        approved,
        merged,
        scores,
        warning,
        document,
    })
}
