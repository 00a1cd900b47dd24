//! Resume Parser: uploaded PDF/DOCX bytes to plain text.

use std::path::Path;

use bytes::Bytes;
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeFormat {
    Pdf,
    Docx,
}

impl ResumeFormat {
    /// Detects the format from the file name suffix only. The content is not
    /// sniffed.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename).extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("pdf") {
            Some(ResumeFormat::Pdf)
        } else if extension.eq_ignore_ascii_case("docx") {
            Some(ResumeFormat::Docx)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("failed to read DOCX: {0}")]
    Docx(String),

    #[error("document parser aborted: {0}")]
    Aborted(String),
}

/// Extracts plain text from the document.
pub fn extract_text(format: ResumeFormat, bytes: &[u8]) -> Result<String, ParseError> {
    match format {
        ResumeFormat::Pdf => extract_pdf_text(bytes),
        ResumeFormat::Docx => extract_docx_text(bytes),
    }
}

/// Runs [`extract_text`] on the blocking pool. A panic inside the PDF library
/// comes back as [`ParseError::Aborted`].
pub async fn extract_text_blocking(format: ResumeFormat, bytes: Bytes) -> Result<String, ParseError> {
    tokio::task::spawn_blocking(move || extract_text(format, &bytes))
        .await
        .map_err(|e| ParseError::Aborted(e.to_string()))?
}

/// Pages are separated by form feeds in pdf-extract output; each page is
/// trimmed at the end and pages are joined by a newline.
fn extract_pdf_text(bytes: &[u8]) -> Result<String, ParseError> {
    let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ParseError::Pdf(e.to_string()))?;
    let text = raw
        .split('\x0c')
        .map(str::trim_end)
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text.trim().to_string())
}

fn extract_docx_text(bytes: &[u8]) -> Result<String, ParseError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ParseError::Docx(e.to_string()))?;

    // Tables and other block types are skipped.
    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n").trim().to_string())
}

/// Concatenated run text of one paragraph.
pub(crate) fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}
