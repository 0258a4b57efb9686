//! Document text extraction: raw upload bytes in, plain transcript out.
//!
//! Extraction is CPU-bound and synchronous; async callers must run it inside
//! `tokio::task::spawn_blocking`.

pub mod docx;
pub mod pdf;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format: {0}. Supported formats: .pdf, .docx")]
    UnsupportedFormat(String),

    #[error("Failed to extract text from PDF: {0}")]
    Pdf(String),

    #[error("Failed to extract text from DOCX: {0}")]
    Docx(String),
}

/// Upload formats the service accepts, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    /// Legacy extension; read with the DOCX reader, so only Open XML content succeeds.
    Doc,
}

impl DocumentFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("pdf") => Ok(DocumentFormat::Pdf),
            Some("docx") => Ok(DocumentFormat::Docx),
            Some("doc") => Ok(DocumentFormat::Doc),
            Some(other) => Err(ExtractionError::UnsupportedFormat(format!(".{other}"))),
            None => Err(ExtractionError::UnsupportedFormat("(no extension)".to_string())),
        }
    }

    /// Lower-cased extension including the leading dot, as reported to clients.
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
            DocumentFormat::Doc => ".doc",
        }
    }
}

/// Produces plain text from raw document bytes.
///
/// Carried in `AppState` as `Arc<dyn TextSource>` so tests can swap in fakes.
pub trait TextSource: Send + Sync {
    fn extract(&self, content: &[u8], format: DocumentFormat) -> Result<String, ExtractionError>;
}

/// Default source: `pdf-extract` for PDFs, an Open XML walk for Word files.
pub struct DocumentTextSource;

impl TextSource for DocumentTextSource {
    fn extract(&self, content: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
        match format {
            DocumentFormat::Pdf => pdf::extract_text(content),
            DocumentFormat::Docx | DocumentFormat::Doc => docx::extract_text(content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(DocumentFormat::from_file_name("cv.pdf").unwrap(), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_file_name("CV.PDF").unwrap(), DocumentFormat::Pdf);
        assert_eq!(
            DocumentFormat::from_file_name("resumes/jane.docx").unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(DocumentFormat::from_file_name("old.doc").unwrap(), DocumentFormat::Doc);
    }

    #[test]
    fn test_unsupported_formats_are_rejected() {
        let err = DocumentFormat::from_file_name("notes.txt").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref ext) if ext == ".txt"));
        assert!(DocumentFormat::from_file_name("resume").is_err());
    }

    #[test]
    fn test_extension_label() {
        assert_eq!(DocumentFormat::Docx.extension(), ".docx");
        assert_eq!(DocumentFormat::Doc.extension(), ".doc");
    }
}
