//! Approval gate: the user's yes/no decision per extracted skill.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::skills::{SkillId, SkillMap};

/// One extracted skill offered to the user for approval.
#[derive(Debug, Clone, Serialize)]
pub struct SkillCandidate {
    pub id: SkillId,
    pub section: String,
    pub skill: String,
    /// Prompt shown next to the toggle, e.g. "Add to Technical Skills: Rust?"
    pub label: String,
}

/// Flattens the extracted mapping into candidates, in extraction order.
pub fn candidates(extracted: &SkillMap) -> Vec<SkillCandidate> {
    extracted
        .groups()
        .flat_map(|group| {
            group.skills.iter().map(move |skill| SkillCandidate {
                id: SkillId::new(&group.section, skill),
                section: group.section.clone(),
                skill: skill.clone(),
                label: format!("Add to {}: {}?", group.section, skill),
            })
        })
        .collect()
}

/// Keeps only the skills whose id is in `decisions`.
///
/// Order is preserved; sections with no approved skill are dropped. Ids that
/// do not name an extracted skill are ignored.
pub fn approve(extracted: &SkillMap, decisions: &HashSet<SkillId>) -> SkillMap {
    let mut approved = SkillMap::new();
    for group in extracted.groups() {
        for skill in &group.skills {
            if decisions.contains(&SkillId::new(&group.section, skill)) {
                approved.push(&group.section, skill.clone());
            }
        }
    }
    approved
}
