mod config;
mod embedding;
mod errors;
mod evaluation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::HfEmbeddingClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Evaluator v{}", env!("CARGO_PKG_VERSION"));

    if config.huggingface_api_token.is_none() {
        warn!(
            "No Hugging Face API token found. Set HUGGINGFACE_API_TOKEN (env or .env); \
             get one from https://huggingface.co/settings/tokens. Evaluations will fail until then."
        );
    }

    // Initialize embedding client (one shared connection pool for all requests)
    let embedder = HfEmbeddingClient::from_config(&config)?;
    info!(
        "Embedding client initialized (url: {}, timeout: {}s, retry: {})",
        config.embedding_api_url, config.embedding_timeout_secs, config.embedding_retry
    );

    let state = AppState {
        embedder: Arc::new(embedder),
        config: config.clone(),
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
