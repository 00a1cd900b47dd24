use serde::{Deserialize, Serialize};

/// Section that collects lines seen before the first detected header.
pub const DEFAULT_SECTION: &str = "Other";

/// A named, ordered block of resume lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    /// Header line as it appeared in the document (`"Experience:"`). `None`
    /// for the default section and sections added by a merge.
    #[serde(skip)]
    pub header: Option<String>,
    pub lines: Vec<String>,
}

impl Section {
    /// The line written above the section's body on export.
    pub fn heading(&self) -> &str {
        self.header.as_deref().unwrap_or(&self.name)
    }
}

/// Resume text split into sections, kept in document order.
///
/// Section names are unique. Re-opening an existing name keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeSections {
    sections: Vec<Section>,
}

impl ResumeSections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.position(name).map(|i| self.sections[i].lines.as_slice())
    }

    /// Starts a section under `header` with no lines. An existing section of
    /// the same name is cleared in place.
    pub fn start_section(&mut self, name: &str, header: &str) {
        let header = Some(header.trim().to_string());
        match self.position(name) {
            Some(i) => {
                let section = &mut self.sections[i];
                section.header = header;
                section.lines.clear();
            }
            None => self.sections.push(Section {
                name: name.to_string(),
                header,
                lines: Vec::new(),
            }),
        }
    }

    /// Appends a line, creating the section at the end if it does not exist yet.
    pub fn push_line(&mut self, name: &str, line: impl Into<String>) {
        let line = line.into();
        match self.position(name) {
            Some(i) => self.sections[i].lines.push(line),
            None => self.sections.push(Section {
                name: name.to_string(),
                header: None,
                lines: vec![line],
            }),
        }
    }

    /// Plain-text rendering: each section is its heading on one line followed
    /// by its lines, sections separated by a newline.
    pub fn flatten(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("{}\n{}", s.heading(), s.lines.join("\n")))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.name == name)
    }
}
