/// Affinda client: the optional third-party structured source for resume parsing.
///
/// Exactly one upload per request, never retried. Any failure surfaces as an
/// `UpstreamError`, which the parse pipeline treats as "no structured source"
/// and answers from the local heuristics instead.
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{multipart, Client};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::StructuredValue;

pub const DEFAULT_AFFINDA_URL: &str = "https://api.affinda.com/v1/resumes";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Top-level keys that may carry a flat transcript, in priority order.
const TRANSCRIPT_KEYS: &[&str] = &["text", "parsed_text", "raw_text"];
/// Same, one level down under `data`.
const NESTED_TRANSCRIPT_KEYS: &[&str] = &["text", "raw_text"];

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited by the resume parsing service")]
    RateLimited,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Connection settings, built once from `Config` at startup.
#[derive(Debug, Clone)]
pub struct AffindaConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout: Duration,
}

/// Decoded upstream payload plus any transcript it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredResponse {
    pub document: StructuredValue,
    pub transcript: Option<String>,
}

impl StructuredResponse {
    pub fn from_json(value: serde_json::Value) -> Self {
        let document = StructuredValue::from(value);
        let transcript = find_transcript(&document);
        Self {
            document,
            transcript,
        }
    }
}

fn find_transcript(document: &StructuredValue) -> Option<String> {
    let first_text = |node: &StructuredValue, keys: &[&str]| {
        keys.iter()
            .filter_map(|key| node.get(key))
            .filter_map(|value| value.as_str())
            .find(|text| !text.is_empty())
            .map(str::to_string)
    };

    first_text(document, TRANSCRIPT_KEYS).or_else(|| {
        document
            .get("data")
            .and_then(|data| first_text(data, NESTED_TRANSCRIPT_KEYS))
    })
}

/// A remote service that turns resume bytes into a schema-less structured payload.
///
/// Carried in `AppState` as `Option<Arc<dyn StructuredResponseAdapter>>`;
/// `None` when no API key is configured.
#[async_trait]
pub trait StructuredResponseAdapter: Send + Sync {
    async fn parse(
        &self,
        content: Bytes,
        file_name: &str,
    ) -> Result<StructuredResponse, UpstreamError>;
}

#[derive(Clone)]
pub struct AffindaClient {
    client: Client,
    config: AffindaConfig,
}

impl AffindaClient {
    pub fn new(config: AffindaConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl StructuredResponseAdapter for AffindaClient {
    /// Uploads the document as multipart `file` with bearer auth.
    async fn parse(
        &self,
        content: Bytes,
        file_name: &str,
    ) -> Result<StructuredResponse, UpstreamError> {
        let part = multipart::Part::bytes(content.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            warn!("Affinda rate limit hit for {file_name}");
            return Err(UpstreamError::RateLimited);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!("Affinda returned {status}: {message}");
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let parsed = StructuredResponse::from_json(serde_json::from_slice(&body)?);
        debug!(
            "Affinda response decoded: {} bytes, transcript={}",
            body.len(),
            parsed.transcript.is_some()
        );
        Ok(parsed)
    }
}
