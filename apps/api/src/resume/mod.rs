// Resume pipeline: parse → split → merge → export.
// Skill extraction lives in `skills`; this module only consumes approved skills.

pub mod export;
pub mod handlers;
pub mod merge;
pub mod parser;
pub mod pipeline;
pub mod sections;
