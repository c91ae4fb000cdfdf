use std::sync::Arc;

use crate::config::Config;
use crate::embedding::EmbeddingProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no per-request data; everything an evaluation creates is dropped with the request.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable embedding source. Default: `HfEmbeddingClient`.
    pub embedder: Arc<dyn EmbeddingProvider>,
    pub config: Config,
}
