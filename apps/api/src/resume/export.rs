//! Exporter: renders the merged resume as a downloadable document.
//!
//! - `Text`: the flattened sections as UTF-8 text.
//! - `Native` + DOCX source: the uploaded document with added lines appended
//!   after their section headers. Layout of everything else is preserved.
//! - `Native` + PDF source: a fresh PDF (original layout is not preserved).

use std::collections::HashSet;
use std::io::{BufWriter, Cursor};
use std::str::FromStr;

use docx_rs::{BreakType, DocumentChild, Paragraph, Run};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use serde::Deserialize;
use thiserror::Error;

use crate::models::resume::ResumeSections;
use crate::resume::merge::MergedResume;
use crate::resume::parser::{paragraph_text, ResumeFormat};
use crate::resume::sections::normalize_header;

const TEXT_FILENAME: &str = "Updated_Resume.txt";
const DOCX_FILENAME: &str = "Updated_Resume.docx";
const PDF_FILENAME: &str = "Updated_Resume.pdf";

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 7.0;
const HEADER_FONT_PT: f32 = 14.0;
const BODY_FONT_PT: f32 = 12.0;
/// Helvetica 12pt fits roughly this many characters in 180mm.
const WRAP_COLUMNS: usize = 90;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Same kind of document as the upload.
    #[default]
    Native,
    Text,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "" => Ok(ExportFormat::Native),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(format!("unknown export format '{other}' (expected 'native' or 'text')")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to reopen original DOCX: {0}")]
    DocxRead(String),

    #[error("failed to write DOCX: {0}")]
    DocxWrite(String),

    #[error("failed to write PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub fn export(
    format: ExportFormat,
    source: ResumeFormat,
    original: &[u8],
    merged: &MergedResume,
) -> Result<ExportedDocument, ExportError> {
    match (format, source) {
        (ExportFormat::Text, _) => Ok(export_text(&merged.sections)),
        (ExportFormat::Native, ResumeFormat::Docx) => export_docx(original, merged),
        (ExportFormat::Native, ResumeFormat::Pdf) => export_pdf(&merged.sections),
    }
}

pub fn export_text(sections: &ResumeSections) -> ExportedDocument {
    ExportedDocument {
        filename: TEXT_FILENAME,
        content_type: "text/plain; charset=utf-8",
        bytes: sections.flatten().into_bytes(),
    }
}

/// Appends each addition as a new run after every paragraph whose text is
/// the section header. Additions with no matching header paragraph (new
/// sections, or the implicit default section) are appended at the end of the
/// document as a bold header followed by the line.
pub fn export_docx(original: &[u8], merged: &MergedResume) -> Result<ExportedDocument, ExportError> {
    let mut docx = docx_rs::read_docx(original).map_err(|e| ExportError::DocxRead(e.to_string()))?;

    let mut placed: HashSet<&str> = HashSet::new();
    for child in docx.document.children.iter_mut() {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };
        let text = paragraph_text(&**paragraph);
        let header = normalize_header(&text);
        if header.is_empty() {
            continue;
        }

        let lines: Vec<&str> = merged
            .additions_for(header)
            .filter(|a| !a.new_section)
            .map(|a| a.line.as_str())
            .collect();
        if lines.is_empty() {
            continue;
        }

        let mut run = Run::new();
        for line in &lines {
            run = run.add_break(BreakType::TextWrapping).add_text(*line);
        }
        let updated = (**paragraph).clone().add_run(run);
        **paragraph = updated;

        for addition in merged.additions.iter().filter(|a| a.section == header) {
            placed.insert(addition.section.as_str());
        }
    }

    for addition in merged
        .additions
        .iter()
        .filter(|a| !placed.contains(a.section.as_str()))
    {
        docx = docx
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(&addition.section).bold()))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(&addition.line)));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| ExportError::DocxWrite(e.to_string()))?;

    Ok(ExportedDocument {
        filename: DOCX_FILENAME,
        content_type: DOCX_CONTENT_TYPE,
        bytes: buf.into_inner(),
    })
}

/// Lays the sections out top to bottom on A4 pages: a bold header line per
/// section, then its lines wrapped to the page width.
pub fn export_pdf(sections: &ResumeSections) -> Result<ExportedDocument, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new("Updated Resume", Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");

    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ExportError::Pdf(format!("font: {e:?}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ExportError::Pdf(format!("font: {e:?}")))?;

    let mut cursor = PageCursor {
        layer: doc.get_page(page).get_layer(layer),
        y: A4_HEIGHT_MM - MARGIN_MM,
    };

    for section in sections.iter() {
        cursor.ensure_room(&doc);
        cursor.write(section.heading(), HEADER_FONT_PT, &bold);
        for line in &section.lines {
            for wrapped in wrap_line(line, WRAP_COLUMNS) {
                cursor.ensure_room(&doc);
                cursor.write(&wrapped, BODY_FONT_PT, &regular);
            }
        }
    }

    drop(cursor);
    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| ExportError::Pdf(format!("save: {e:?}")))?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    Ok(ExportedDocument {
        filename: PDF_FILENAME,
        content_type: "application/pdf",
        bytes,
    })
}

struct PageCursor {
    layer: PdfLayerReference,
    y: f32,
}

impl PageCursor {
    fn ensure_room(&mut self, doc: &printpdf::PdfDocumentReference) {
        if self.y < MARGIN_MM {
            let (page, layer) = doc.add_page(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), "Layer 1");
            self.layer = doc.get_page(page).get_layer(layer);
            self.y = A4_HEIGHT_MM - MARGIN_MM;
        }
    }

    fn write(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= LINE_HEIGHT_MM;
    }
}

/// Greedy word wrap by character count. Words longer than `width` are split.
/// An empty line yields one empty line so blank lines keep their spacing.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            out.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || out.is_empty() {
        out.push(current);
    }
    out
}
