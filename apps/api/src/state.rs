use std::sync::Arc;

use crate::artifacts::ArtifactStore;
use crate::config::Config;
use crate::skills::extractor::SkillExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable skill extractor. Default: LlmSkillExtractor.
    pub extractor: Arc<dyn SkillExtractor>,
    /// Per-request output documents awaiting download.
    pub artifacts: ArtifactStore,
    pub config: Config,
}
