use std::time::Duration;

use anyhow::{Context, Result};

use crate::affinda_client::{AffindaConfig, DEFAULT_AFFINDA_URL, DEFAULT_TIMEOUT_SECS};

const DEFAULT_PORT: u16 = 8001;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    /// Present only when `AFFINDA_API_KEY` is set; enables the structured source.
    pub affinda: Option<AffindaConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let affinda = match lookup("AFFINDA_API_KEY").filter(|key| !key.trim().is_empty()) {
            Some(api_key) => Some(AffindaConfig {
                api_key,
                api_url: lookup("AFFINDA_API_URL")
                    .unwrap_or_else(|| DEFAULT_AFFINDA_URL.to_string()),
                timeout: Duration::from_secs(parse_or(
                    &lookup,
                    "AFFINDA_TIMEOUT_SECS",
                    DEFAULT_TIMEOUT_SECS,
                )?),
            }),
            None => None,
        };

        Ok(Config {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            affinda,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
