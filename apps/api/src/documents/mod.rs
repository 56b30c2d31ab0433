//! Document conversion — turns uploaded files into plain text.
//!
//! The analysis core only ever sees text. Anything that goes wrong here is
//! reported as an [`ExtractionError`], which the pipeline turns into an inline
//! marker so the rest of a batch still gets processed.

pub mod docx;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// Kind of an uploaded resume, decided from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    Unsupported,
}

impl FileKind {
    /// Case-insensitive match on the extension.
    pub fn from_file_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            FileKind::Pdf
        } else if lower.ends_with(".docx") {
            FileKind::Docx
        } else {
            FileKind::Unsupported
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type. Please upload a PDF or DOCX resume.")]
    UnsupportedFormat,

    #[error("Error reading PDF: {0}")]
    Pdf(String),

    #[error("Error reading DOCX: {0}")]
    Docx(String),
}

impl ExtractionError {
    /// Text substituted for the document body when conversion fails.
    pub fn marker(&self) -> String {
        format!("❌ {self}")
    }
}

/// Converts a document to plain text.
#[async_trait]
pub trait DocumentConverter: Send + Sync {
    async fn convert_to_text(&self, bytes: Bytes, kind: FileKind)
        -> Result<String, ExtractionError>;
}

/// Converter backed by `pdf-extract` and the built-in DOCX reader.
pub struct NativeConverter;

#[async_trait]
impl DocumentConverter for NativeConverter {
    async fn convert_to_text(
        &self,
        bytes: Bytes,
        kind: FileKind,
    ) -> Result<String, ExtractionError> {
        match kind {
            FileKind::Pdf => tokio::task::spawn_blocking(move || {
                pdf_extract::extract_text_from_mem(&bytes)
                    .map_err(|e| ExtractionError::Pdf(e.to_string()))
            })
            .await
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?,
            FileKind::Docx => tokio::task::spawn_blocking(move || docx::extract_text(&bytes))
                .await
                .map_err(|e| ExtractionError::Docx(e.to_string()))?,
            FileKind::Unsupported => Err(ExtractionError::UnsupportedFormat),
        }
    }
}

/// Decodes a plain-text upload. Invalid UTF-8 is replaced, never rejected.
pub fn read_as_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
