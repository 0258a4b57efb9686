use tracing::warn;

use super::ExtractionError;

/// Extracts the text layer of a PDF held in memory.
pub fn extract_text(content: &[u8]) -> Result<String, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(content).map_err(|e| {
        warn!("PDF text extraction failed: {e}");
        ExtractionError::Pdf(e.to_string())
    })?;
    Ok(text.trim().to_string())
}
