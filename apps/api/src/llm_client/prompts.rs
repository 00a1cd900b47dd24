// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Instruction appended to prompts whose response is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "Respond with the JSON object only. \
    Do NOT include any text outside the JSON object. \
    Do NOT include explanations or apologies.";
