//! Skill Extractor: turns a job description into a section -> skills mapping.
//!
//! `AppState` holds an `Arc<dyn SkillExtractor>`; `LlmSkillExtractor` is the
//! production backend. Extraction either fully succeeds or yields nothing:
//! callers that must keep going use [`extract_or_empty`].

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, LlmClient, LlmError};
use crate::models::skills::SkillMap;
use crate::skills::prompts::{build_skill_extraction_prompt, SKILL_EXTRACTION_SYSTEM};

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The model answered, but not with a JSON object.
    #[error("Failed to parse extracted skills from the model response: {0}")]
    Malformed(String),

    /// Authentication, quota, network or other service failure.
    #[error("Skill extraction service unavailable: {0}")]
    Unavailable(String),
}

impl From<LlmError> for ExtractionError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyContent => ExtractionError::Malformed(e.to_string()),
            LlmError::Http(_) | LlmError::Api { .. } => ExtractionError::Unavailable(e.to_string()),
        }
    }
}

/// The skill extractor trait. Implement this to swap backends without
/// touching the handlers.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, job_description: &str) -> Result<SkillMap, ExtractionError>;
}

/// Extracts skills with one chat-completion call.
pub struct LlmSkillExtractor {
    llm: LlmClient,
}

impl LlmSkillExtractor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract(&self, job_description: &str) -> Result<SkillMap, ExtractionError> {
        let prompt = build_skill_extraction_prompt(job_description);
        let text = self.llm.call_text(&prompt, SKILL_EXTRACTION_SYSTEM).await?;
        parse_skill_response(&text)
    }
}

/// Parses the model's text as a JSON object of section -> skills.
pub fn parse_skill_response(text: &str) -> Result<SkillMap, ExtractionError> {
    let value: serde_json::Value = serde_json::from_str(strip_json_fences(text))
        .map_err(|e| ExtractionError::Malformed(e.to_string()))?;
    SkillMap::from_value(value)
        .ok_or_else(|| ExtractionError::Malformed("expected a JSON object".to_string()))
}

/// Result of a best-effort extraction.
#[derive(Debug, Default)]
pub struct Extraction {
    pub skills: SkillMap,
    /// User-facing message when extraction failed.
    pub warning: Option<String>,
}

/// Runs the extractor, converting any failure into an empty mapping plus a
/// user-facing warning.
pub async fn extract_or_empty(extractor: &dyn SkillExtractor, job_description: &str) -> Extraction {
    match extractor.extract(job_description).await {
        Ok(skills) => {
            info!(
                "Extracted {} skills across {} sections",
                skills.skill_count(),
                skills.groups().count()
            );
            Extraction {
                skills,
                warning: None,
            }
        }
        Err(e) => {
            warn!("Skill extraction failed: {e}");
            let warning = match &e {
                ExtractionError::Malformed(_) => {
                    "Failed to parse extracted skills from the model response.".to_string()
                }
                ExtractionError::Unavailable(msg) => format!("Error extracting skills: {msg}"),
            };
            Extraction {
                skills: SkillMap::new(),
                warning: Some(warning),
            }
        }
    }
}
