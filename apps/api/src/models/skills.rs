use std::fmt;
use std::str::FromStr;

use serde::{
    de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;

/// Skills grouped under one resume section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillGroup {
    pub section: String,
    pub skills: Vec<String>,
}

/// Section name -> skills, in the order the sections were first seen.
///
/// On the wire this is a plain JSON object, e.g.
/// `{"Technical Skills": ["Rust", "Tokio"], "Certifications": ["CKA"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillMap {
    groups: Vec<SkillGroup>,
}

impl SkillMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no section holds any skill.
    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.skills.is_empty())
    }

    /// Total number of skills across all sections.
    pub fn skill_count(&self) -> usize {
        self.groups.iter().map(|g| g.skills.len()).sum()
    }

    pub fn groups(&self) -> impl Iterator<Item = &SkillGroup> {
        self.groups.iter()
    }

    pub fn get(&self, section: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.section == section)
            .map(|g| g.skills.as_slice())
    }

    pub fn push(&mut self, section: &str, skill: impl Into<String>) {
        let skill = skill.into();
        match self.groups.iter_mut().find(|g| g.section == section) {
            Some(group) => group.skills.push(skill),
            None => self.groups.push(SkillGroup {
                section: section.to_string(),
                skills: vec![skill],
            }),
        }
    }

    /// Builds a map from a loosely shaped model response.
    ///
    /// Returns `None` unless the value is a JSON object. Array values keep
    /// their scalar items (non-string scalars are stringified, nested
    /// containers and nulls are skipped); a bare string becomes a single skill.
    /// Sections that end up empty are dropped.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(object) = value else {
            return None;
        };

        let mut map = SkillMap::new();
        for (section, value) in object {
            let skills: Vec<String> = match value {
                Value::Array(items) => items.into_iter().filter_map(scalar_to_skill).collect(),
                other => scalar_to_skill(other).into_iter().collect(),
            };
            for skill in skills {
                map.push(&section, skill);
            }
        }
        Some(map)
    }
}

fn scalar_to_skill(value: Value) -> Option<String> {
    let skill = match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    let skill = skill.trim();
    (!skill.is_empty()).then(|| skill.to_string())
}

impl Serialize for SkillMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.section, &group.skills)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SkillMap::from_value(value)
            .ok_or_else(|| de::Error::custom("expected a JSON object of section -> skills"))
    }
}

/// Identifies one extracted skill. Rendered as `"<section>::<skill>"`; the
/// first `::` separates the section from the skill.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SkillIdRepr", into = "String")]
pub struct SkillId {
    pub section: String,
    pub skill: String,
}

impl SkillId {
    pub fn new(section: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            skill: skill.into(),
        }
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.section, self.skill)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid skill id '{0}': expected '<section>::<skill>'")]
pub struct InvalidSkillId(String);

impl FromStr for SkillId {
    type Err = InvalidSkillId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once("::") {
            Some((section, skill)) if !section.is_empty() && !skill.is_empty() => {
                Ok(SkillId::new(section, skill))
            }
            _ => Err(InvalidSkillId(s.to_string())),
        }
    }
}

impl From<SkillId> for String {
    fn from(id: SkillId) -> Self {
        id.to_string()
    }
}

/// Clients may send either the string form or `{section, skill}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SkillIdRepr {
    Text(String),
    Pair { section: String, skill: String },
}

impl TryFrom<SkillIdRepr> for SkillId {
    type Error = InvalidSkillId;

    fn try_from(repr: SkillIdRepr) -> Result<Self, Self::Error> {
        match repr {
            SkillIdRepr::Text(s) => s.parse(),
            SkillIdRepr::Pair { section, skill } => Ok(SkillId { section, skill }),
        }
    }
}
