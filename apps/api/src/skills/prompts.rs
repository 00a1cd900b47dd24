use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// System prompt for skill extraction.
pub const SKILL_EXTRACTION_SYSTEM: &str = "You are an AI expert in resume optimization.";

/// Skill extraction prompt template. Replace `{job_description}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract key skills, tools, technologies, and relevant qualifications from the following job description.
Classify them into resume sections such as 'Technical Skills', 'Certifications', 'Experience', 'Projects', etc.
Provide the output as a JSON object where keys are section names and values are lists of skills.

Job Description:
{job_description}"#;

pub fn build_skill_extraction_prompt(job_description: &str) -> String {
    let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{job_description}", job_description);
    format!("{prompt}\n\n{JSON_ONLY_INSTRUCTION}")
}
