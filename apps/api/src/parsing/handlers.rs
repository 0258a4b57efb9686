use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::models::{ContactRecord, StructuredValue};
use crate::parsing::orchestrator::{resolve, ExtractionPath};
use crate::parsing::pipeline::{parse_resume, ParseResponse};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ExtractContactRequest {
    pub text: Option<String>,
    pub structured: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ExtractContactResponse {
    pub source: ExtractionPath,
    pub contact: ContactRecord,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::Validation("No file name provided".to_string()))?;
        let content = field.bytes().await?;

        let response = parse_resume(&state, &file_name, content).await?;
        return Ok(Json(response));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// POST /api/v1/contact/extract
///
/// Runs the orchestrator directly over caller-supplied text and/or payload.
pub async fn handle_extract_contact(
    Json(req): Json<ExtractContactRequest>,
) -> Result<Json<ExtractContactResponse>, AppError> {
    if req.text.is_none() && req.structured.is_none() {
        return Err(AppError::Validation(
            "Provide at least one of 'text' or 'structured'".to_string(),
        ));
    }

    let structured = req.structured.map(StructuredValue::from);
    let resolution = resolve(req.text.as_deref(), structured.as_ref());

    Ok(Json(ExtractContactResponse {
        source: resolution.path,
        contact: resolution.record,
    }))
}
