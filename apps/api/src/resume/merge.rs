//! Resume Merger: folds approved skills into the parsed sections.

use serde::Serialize;

use crate::models::resume::ResumeSections;
use crate::models::skills::SkillMap;

/// One line added to the resume by the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Addition {
    pub section: String,
    pub line: String,
    /// True when the section did not exist in the uploaded resume.
    pub new_section: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedResume {
    pub sections: ResumeSections,
    pub additions: Vec<Addition>,
}

impl MergedResume {
    pub fn additions_for<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Addition> + 'a {
        self.additions.iter().filter(move |a| a.section == section)
    }
}

/// Appends each approved section's skills as one comma-joined line, creating
/// sections that do not exist yet. An empty approval leaves `sections` as-is.
pub fn merge_skills(mut sections: ResumeSections, approved: &SkillMap) -> MergedResume {
    let mut additions = Vec::new();

    for group in approved.groups().filter(|g| !g.skills.is_empty()) {
        let line = group.skills.join(", ");
        let new_section = !sections.contains(&group.section);
        sections.push_line(&group.section, line.clone());
        additions.push(Addition {
            section: group.section.clone(),
            line,
            new_section,
        });
    }

    MergedResume {
        sections,
        additions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::sections::split_sections;

    #[test]
    fn test_empty_approval_leaves_sections_unchanged() {
        let sections = split_sections("Experience:\nDid stuff\nSkills:\nPython");
        let merged = merge_skills(sections.clone(), &SkillMap::new());
        assert_eq!(merged.sections, sections);
        assert!(merged.additions.is_empty());
    }

    #[test]
    fn test_existing_section_gets_one_joined_line() {
        let sections = split_sections("Skills:\nPython");
        let mut approved = SkillMap::new();
        approved.push("Skills", "Rust");
        approved.push("Skills", "SQL");

        let merged = merge_skills(sections, &approved);
        assert_eq!(merged.sections.get("Skills").unwrap(), ["Python", "Rust, SQL"]);
        assert_eq!(
            merged.additions,
            [Addition {
                section: "Skills".into(),
                line: "Rust, SQL".into(),
                new_section: false,
            }]
        );
    }

    #[test]
    fn test_missing_section_is_created_at_end() {
        let sections = split_sections("Experience:\nDid stuff");
        let mut approved = SkillMap::new();
        approved.push("Certifications", "AWS SAA");

        let merged = merge_skills(sections, &approved);
        let names: Vec<_> = merged.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Experience", "Certifications"]);
        assert_eq!(merged.sections.get("Certifications").unwrap(), ["AWS SAA"]);
        assert!(merged.additions[0].new_section);
    }

    #[test]
    fn test_flattened_output() {
        let sections = split_sections("Skills:\nPython");
        let mut approved = SkillMap::new();
        approved.push("Skills", "Rust");
        approved.push("Tools", "Docker");

        let merged = merge_skills(sections, &approved);
        assert_eq!(
            merged.sections.flatten(),
            "Skills:\nPython\nRust\nTools\nDocker"
        );
        assert_eq!(merged.additions_for("Tools").count(), 1);
    }
}
