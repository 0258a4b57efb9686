//! Per-request resume parsing: upstream structured source first, local
//! document extraction when needed, then the orchestrator.

use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::affinda_client::{StructuredResponse, StructuredResponseAdapter};
use crate::errors::AppError;
use crate::models::ContactRecord;
use crate::parsing::orchestrator::{resolve, select_transcript, ExtractionPath};
use crate::state::AppState;
use crate::text_source::{DocumentFormat, TextSource};

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub success: bool,
    pub request_id: Uuid,
    pub file_name: String,
    pub file_type: &'static str,
    pub source: ExtractionPath,
    pub text: String,
    pub text_length: usize,
    #[serde(flatten)]
    pub contact: ContactRecord,
}

/// Parses one uploaded resume.
///
/// Fails only when the format is unsupported or no transcript text can be
/// produced at all. Upstream failures degrade to local extraction.
pub async fn parse_resume(
    state: &AppState,
    file_name: &str,
    content: Bytes,
) -> Result<ParseResponse, AppError> {
    let format = DocumentFormat::from_file_name(file_name)?;
    let request_id = Uuid::new_v4();
    let span = info_span!("parse_resume", %request_id, file_name, file_type = format.extension());

    async move {
        info!("Starting resume parse ({} bytes)", content.len());

        let structured =
            fetch_structured(state.structured_source.as_deref(), &content, file_name).await;

        let transcript = match select_transcript(structured.as_ref()) {
            Some(text) => text.to_string(),
            None => extract_document_text(state.text_source.clone(), content, format).await?,
        };

        if transcript.trim().is_empty() {
            return Err(AppError::UnprocessableEntity(
                "Failed to extract text from the file. The file might be corrupted or empty."
                    .to_string(),
            ));
        }

        let resolution = resolve(Some(&transcript), structured.as_ref().map(|s| &s.document));
        let contact = resolution.record;
        info!(
            "Parsed resume via {:?}: name={:?}, email={:?}, skills={}",
            resolution.path,
            contact.full_name,
            contact.email,
            contact.skills.len()
        );

        Ok(ParseResponse {
            success: true,
            request_id,
            file_name: file_name.to_string(),
            file_type: format.extension(),
            source: resolution.path,
            text_length: transcript.chars().count(),
            text: transcript,
            contact,
        })
    }
    .instrument(span)
    .await
}

/// One upstream attempt; any failure is logged and treated as "no structured source".
async fn fetch_structured(
    adapter: Option<&dyn StructuredResponseAdapter>,
    content: &Bytes,
    file_name: &str,
) -> Option<StructuredResponse> {
    let adapter = adapter?;
    match adapter.parse(content.clone(), file_name).await {
        Ok(response) => Some(response),
        Err(e) => {
            warn!("Structured parsing failed, falling back to local extraction: {e}");
            None
        }
    }
}

async fn extract_document_text(
    text_source: Arc<dyn TextSource>,
    content: Bytes,
    format: DocumentFormat,
) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || text_source.extract(&content, format))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Text extraction task failed: {e}")))??;
    Ok(text)
}
