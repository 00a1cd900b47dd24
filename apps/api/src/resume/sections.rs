//! Section Splitter: partitions resume text into named sections.
//!
//! A line is a header when it is a capitalised run of letters and spaces
//! ending in a colon (`"Technical Skills:"`). The section key is the header
//! without surrounding whitespace or the colon. Everything before the first
//! header lands in [`DEFAULT_SECTION`]. Body lines that happen to look like
//! headers are misclassified; there is no correction pass.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::resume::{ResumeSections, DEFAULT_SECTION};

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Z][A-Za-z ]+:\s*$").expect("valid header regex"));

/// Returns the section name if `line` is a header line.
pub fn header_name(line: &str) -> Option<&str> {
    if HEADER_RE.is_match(line) {
        Some(normalize_header(line))
    } else {
        None
    }
}

/// `"  Work Experience :  "` → `"Work Experience"`.
pub fn normalize_header(text: &str) -> &str {
    text.trim().trim_end_matches(':').trim_end()
}

pub fn split_sections(text: &str) -> ResumeSections {
    let mut sections = ResumeSections::new();
    let mut current = DEFAULT_SECTION.to_string();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match header_name(line) {
            Some(name) => {
                current = name.to_string();
                sections.start_section(&current, line);
            }
            None => sections.push_line(&current, line),
        }
    }

    sections
}
