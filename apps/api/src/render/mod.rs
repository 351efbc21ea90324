// Document rendering: resume text → DOCX (structured) or PDF (paginated) bytes.
// Output is built in memory and returned to the caller; nothing touches disk.

pub mod docx;
pub mod handlers;
pub mod pdf;

use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::layout::{paginate, resume_lines, PageConfig};

/// Output format. `Structured` is DOCX, `Paginated` is PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderFormat {
    Structured,
    Paginated,
}

impl RenderFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RenderFormat::Structured => "docx",
            RenderFormat::Paginated => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            RenderFormat::Structured => "application/octet-stream",
            RenderFormat::Paginated => "application/pdf",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "docx" | "structured" => Ok(RenderFormat::Structured),
            "pdf" | "paginated" => Ok(RenderFormat::Paginated),
            other => Err(format!(
                "unknown render format '{other}' (expected docx, structured, pdf or paginated)"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

/// Container or IO failure while assembling a document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("docx packaging failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("pdf assembly failed: {0}")]
    Pdf(String),
}

/// Renders resume text in either format. Holds only the fixed page geometry.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    page_config: PageConfig,
}

impl DocumentRenderer {
    pub fn new(page_config: PageConfig) -> Self {
        Self { page_config }
    }

    pub fn page_config(&self) -> &PageConfig {
        &self.page_config
    }

    /// CPU-bound; call from `spawn_blocking` inside async code.
    pub fn render(
        &self,
        resume: &str,
        format: RenderFormat,
    ) -> Result<RenderedDocument, RenderError> {
        let lines = resume_lines(resume);

        let bytes = match format {
            RenderFormat::Structured => {
                let bytes = docx::write_docx(&lines)?;
                info!(format = "structured", lines = lines.len(), "Rendered DOCX");
                bytes
            }
            RenderFormat::Paginated => {
                let layout = paginate(&lines, &self.page_config);
                let overflowing = layout.overflowing_lines();
                if overflowing > 0 {
                    debug!(overflowing, "Lines wider than the text area emitted unwrapped");
                }
                let bytes = pdf::write_pdf(&layout, &self.page_config)?;
                info!(
                    format = "paginated",
                    lines = layout.line_count(),
                    pages = layout.pages.len(),
                    "Rendered PDF"
                );
                bytes
            }
        };

        Ok(RenderedDocument {
            filename: generate_filename(format),
            bytes,
            mime_type: format.mime_type(),
        })
    }
}

/// `resume_<32 hex>.<ext>`, unique per call.
pub fn generate_filename(format: RenderFormat) -> String {
    format!("resume_{}.{}", Uuid::new_v4().simple(), format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_page_config;
    use crate::test_support::{docx_paragraphs, pdf_page_count, pdf_shown_strings, pdf_text_lines};

    const RESUME: &str = "Jane Doe\n(555) 010-2000\n\nExperience\n- Led platform team\n";

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(default_page_config())
    }

    #[test]
    fn test_format_parsing_accepts_both_names() {
        assert_eq!("docx".parse::<RenderFormat>(), Ok(RenderFormat::Structured));
        assert_eq!("structured".parse::<RenderFormat>(), Ok(RenderFormat::Structured));
        assert_eq!("pdf".parse::<RenderFormat>(), Ok(RenderFormat::Paginated));
        assert_eq!("paginated".parse::<RenderFormat>(), Ok(RenderFormat::Paginated));
        assert!("html".parse::<RenderFormat>().is_err());
        assert!("PDF".parse::<RenderFormat>().is_err());
    }

    #[test]
    fn test_structured_paragraph_count_matches_line_count() {
        let doc = renderer().render(RESUME, RenderFormat::Structured).unwrap();
        let paragraphs = docx_paragraphs(&doc.bytes);
        assert_eq!(paragraphs.len(), 6);
        assert_eq!(paragraphs, resume_lines(RESUME));
        assert_eq!(doc.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_paginated_line_count_matches_and_pages_follow_capacity() {
        let text = (1..=100)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = renderer().render(&text, RenderFormat::Paginated).unwrap();
        assert_eq!(pdf_text_lines(&doc.bytes), resume_lines(&text));
        assert_eq!(pdf_shown_strings(&doc.bytes).len(), 100);
        assert_eq!(pdf_page_count(&doc.bytes), 3);
        assert_eq!(doc.mime_type, "application/pdf");
    }

    #[test]
    fn test_paginated_text_reads_back_without_blank_lines() {
        let doc = renderer().render(RESUME, RenderFormat::Paginated).unwrap();
        assert_eq!(
            pdf_text_lines(&doc.bytes),
            vec!["Jane Doe", "(555) 010-2000", "Experience", "- Led platform team"]
        );
        // Blank lines still occupy a slot on the page.
        assert_eq!(pdf_shown_strings(&doc.bytes).len(), 6);
    }

    #[test]
    fn test_empty_input_is_one_empty_paragraph_or_page() {
        let docx = renderer().render("", RenderFormat::Structured).unwrap();
        assert_eq!(docx_paragraphs(&docx.bytes), vec![String::new()]);

        let pdf = renderer().render("", RenderFormat::Paginated).unwrap();
        assert_eq!(pdf_page_count(&pdf.bytes), 1);
        assert_eq!(pdf_shown_strings(&pdf.bytes), vec![Vec::<u8>::new()]);
        assert!(pdf_text_lines(&pdf.bytes).is_empty());
    }

    #[test]
    fn test_repeat_renders_differ_only_in_filename() {
        let r = renderer();
        let a = r.render(RESUME, RenderFormat::Structured).unwrap();
        let b = r.render(RESUME, RenderFormat::Structured).unwrap();
        assert_ne!(a.filename, b.filename);
        assert_eq!(docx_paragraphs(&a.bytes), docx_paragraphs(&b.bytes));

        let c = r.render(RESUME, RenderFormat::Paginated).unwrap();
        let d = r.render(RESUME, RenderFormat::Paginated).unwrap();
        assert_ne!(c.filename, d.filename);
        assert_eq!(pdf_shown_strings(&c.bytes), pdf_shown_strings(&d.bytes));
        assert_eq!(pdf_text_lines(&c.bytes), pdf_text_lines(&d.bytes));
    }

    #[test]
    fn test_filename_shape() {
        for format in [RenderFormat::Structured, RenderFormat::Paginated] {
            let name = generate_filename(format);
            let stem = name
                .strip_prefix("resume_")
                .and_then(|rest| rest.strip_suffix(&format!(".{}", format.extension())))
                .unwrap();
            assert_eq!(stem.len(), 32);
            assert!(stem
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }
}
