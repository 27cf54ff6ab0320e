//! Document extraction: uploaded resume file → plain text.

use std::path::Path;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod native;

/// Upload formats accepted by the intake pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detects the format from the uploaded file name's extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("pdf") {
            Some(DocumentKind::Pdf)
        } else if ext.eq_ignore_ascii_case("docx") {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub ocr: bool,
    pub table_structure: bool,
    pub layout: bool,
}

impl ExtractOptions {
    /// Options used for resumes: no OCR, tables and layout preserved.
    pub const RESUME: ExtractOptions = ExtractOptions {
        ocr: false,
        table_structure: true,
        layout: true,
    };
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("OCR is not available in this deployment")]
    OcrUnavailable,

    #[error("Extraction task aborted: {0}")]
    Aborted(String),

    #[error("Document contains no extractable text")]
    NoText,
}

#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(
        &self,
        path: &Path,
        kind: DocumentKind,
        options: ExtractOptions,
    ) -> Result<String, ExtractError>;
}
