// Skill extraction and approval.
// Extraction goes through llm_client behind the SkillExtractor trait so the
// backend can be swapped (or stubbed in tests) without touching handlers.

pub mod approval;
pub mod extractor;
pub mod handlers;
pub mod prompts;
