mod affinda_client;
mod config;
mod errors;
mod models;
mod parsing;
mod routes;
mod state;
mod text_source;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::affinda_client::{AffindaClient, StructuredResponseAdapter};
use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::text_source::DocumentTextSource;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume parser v{}", env!("CARGO_PKG_VERSION"));

    // Upstream structured parser is optional
    let structured_source: Option<Arc<dyn StructuredResponseAdapter>> = match &config.affinda {
        Some(affinda) => {
            let client = AffindaClient::new(affinda.clone())?;
            info!("Affinda client initialized ({})", affinda.api_url);
            Some(Arc::new(client))
        }
        None => {
            warn!("AFFINDA_API_KEY not set, using local text extraction only");
            None
        }
    };

    let state = AppState {
        config: config.clone(),
        text_source: Arc::new(DocumentTextSource),
        structured_source,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
