// Document supply
// Turns files and web pages into plain-text documents for the scorer

pub mod html;
pub mod markdown;
pub mod office;
pub mod web;


use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::similarity::Document;
use crate::{PlagiarismError, Result};

pub use web::{HttpClient, WebConfig, fetch_document, validate_url};

/// File formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Html,
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detect the format from a file extension (case-insensitive).
    /// Files without an extension are read as plain text.
    #[inline]
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            None | Some("txt" | "text") => Ok(Self::PlainText),
            Some("md" | "markdown") => Ok(Self::Markdown),
            Some("html" | "htm") => Ok(Self::Html),
            Some("pdf") => Ok(Self::Pdf),
            Some("docx") => Ok(Self::Docx),
            Some(other) => Err(PlagiarismError::UnsupportedFormat(format!(
                "'.{}' ({})",
                other,
                path.display()
            ))),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::PlainText => write!(f, "text"),
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
        }
    }
}

/// Convert raw file bytes of the given format to plain text
#[inline]
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::PlainText => Ok(String::from_utf8_lossy(bytes).into_owned()),
        DocumentFormat::Markdown => Ok(markdown::markdown_to_text(&String::from_utf8_lossy(
            bytes,
        ))),
        DocumentFormat::Html => Ok(html::extract_text(&String::from_utf8_lossy(bytes))),
        DocumentFormat::Pdf => office::pdf_to_text(bytes),
        DocumentFormat::Docx => office::docx_to_text(bytes),
    }
}

/// Read and extract one file. The id is the path as given, the filename the file name.
#[inline]
pub fn load_document(path: &Path) -> Result<Document> {
    let format = DocumentFormat::from_path(path)?;
    let bytes = fs::read(path)?;
    let text = extract_text(&bytes, format)?;

    debug!(
        "Extracted {} chars of {} from {}",
        text.len(),
        format,
        path.display()
    );

    let (id, filename) = document_identity(path);
    Ok(Document::new(id, filename, text))
}

/// Load many files for one check.
///
/// Unsupported formats are skipped. A file that fails to read or extract
/// still takes part with empty text, so it scores 0.0 against everything.
#[inline]
pub fn load_documents<P: AsRef<Path>>(paths: &[P]) -> Vec<Document> {
    let mut documents = Vec::with_capacity(paths.len());

    for path in paths {
        let path = path.as_ref();
        match load_document(path) {
            Ok(document) => documents.push(document),
            Err(PlagiarismError::UnsupportedFormat(format)) => {
                warn!("Skipping unsupported file {}", format);
            }
            Err(e) => {
                warn!("Failed to extract {}: {}", path.display(), e);
                let (id, filename) = document_identity(path);
                documents.push(Document::new(id, filename, String::new()));
            }
        }
    }

    documents
}

fn document_identity(path: &Path) -> (String, String) {
    let filename = path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    );
    (path.display().to_string(), filename)
}
