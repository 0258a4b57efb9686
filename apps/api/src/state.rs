use std::sync::Arc;

use crate::affinda_client::StructuredResponseAdapter;
use crate::config::Config;
use crate::text_source::TextSource;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Local document reader. Default: `DocumentTextSource`.
    pub text_source: Arc<dyn TextSource>,
    /// Optional upstream parser; `None` when `AFFINDA_API_KEY` is unset.
    pub structured_source: Option<Arc<dyn StructuredResponseAdapter>>,
}
