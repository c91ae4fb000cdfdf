//! Embedding client — the single point of entry for the remote text-embedding provider.
//!
//! Handlers never talk to the provider directly: they hold an `Arc<dyn EmbeddingProvider>`
//! so tests can swap in a deterministic vector source.
//!
//! Model: sentence-transformers/all-MiniLM-L6-v2 (384 dimensions) behind the
//! Hugging Face inference API.
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

#[cfg(test)]
pub mod fake;

/// Dimension of every vector the provider is expected to return.
pub const EMBEDDING_DIM: usize = 384;
const RETRY_DELAY: Duration = Duration::from_millis(500);
const MODEL_LOADING_MESSAGE: &str = "Model is loading, please wait a moment and try again";

/// A fixed-length vector describing the semantic content of one text.
pub type Embedding = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("{0}")]
    ProviderUnavailable(String),

    #[error("Embedding provider timed out")]
    ProviderTimeout,

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Source of embeddings. Implement this to swap backends without touching the
/// orchestrator or the handlers.
///
/// Carried in `AppState` as `Arc<dyn EmbeddingProvider>`.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
    options: EmbedOptions,
}

#[derive(Debug, Serialize)]
struct EmbedOptions {
    wait_for_model: bool,
}

/// The provider answers a single input with either a bare vector or a batch of one.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbedPayload {
    Flat(Vec<f32>),
    Nested(Vec<Vec<f32>>),
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: String,
}

/// Outcome of one HTTP attempt. Only transient failures are eligible for the retry.
enum AttemptError {
    Transient(EmbeddingError),
    Fatal(EmbeddingError),
}

/// Hugging Face inference API client. Cheap to clone: the inner `reqwest::Client`
/// is a shared connection pool.
#[derive(Clone)]
pub struct HfEmbeddingClient {
    client: Client,
    api_url: String,
    api_token: Option<String>,
    retry: bool,
}

impl HfEmbeddingClient {
    pub fn new(
        api_url: String,
        api_token: Option<String>,
        timeout: Duration,
        retry: bool,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for the embedding provider")?;

        Ok(Self {
            client,
            api_url,
            api_token,
            retry,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(
            config.embedding_api_url.clone(),
            config.huggingface_api_token.clone(),
            Duration::from_secs(config.embedding_timeout_secs),
            config.embedding_retry,
        )
    }

    async fn attempt(&self, token: &str, body: &EmbedRequest<'_>) -> Result<Embedding, AttemptError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            warn!("Embedding provider returned 503 (model loading)");
            return Err(AttemptError::Transient(EmbeddingError::ProviderUnavailable(
                MODEL_LOADING_MESSAGE.to_string(),
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Embedding provider returned {}: {}", status, message);
            return Err(AttemptError::Fatal(EmbeddingError::ProviderUnavailable(
                format!("Embedding provider error: {} - {}", status.as_u16(), message),
            )));
        }

        let text = response.text().await.map_err(classify_transport_error)?;
        parse_embedding(&text).map_err(AttemptError::Fatal)
    }
}

#[async_trait]
impl EmbeddingProvider for HfEmbeddingClient {
    /// Embeds one text. Retries once after a short pause on connection failure or
    /// 503 when retry is enabled; timeouts are never retried.
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let token = self.api_token.as_deref().ok_or_else(|| {
            EmbeddingError::ProviderUnavailable(
                "Hugging Face API token is required. Set HUGGINGFACE_API_TOKEN \
                 (get one from https://huggingface.co/settings/tokens)"
                    .to_string(),
            )
        })?;

        let body = EmbedRequest {
            inputs: text,
            options: EmbedOptions {
                wait_for_model: true,
            },
        };

        let attempts = if self.retry { 2 } else { 1 };
        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..attempts {
            if attempt > 0 {
                warn!(
                    "Embedding call failed, retrying once after {}ms...",
                    RETRY_DELAY.as_millis()
                );
                tokio::time::sleep(RETRY_DELAY).await;
            }

            match self.attempt(token, &body).await {
                Ok(embedding) => {
                    debug!(
                        "Embedding call succeeded: chars={}, dim={}",
                        text.chars().count(),
                        embedding.len()
                    );
                    return Ok(embedding);
                }
                Err(AttemptError::Transient(e)) => last_error = Some(e),
                Err(AttemptError::Fatal(e)) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EmbeddingError::ProviderUnavailable("Embedding provider was not called".to_string())
        }))
    }
}

fn classify_transport_error(e: reqwest::Error) -> AttemptError {
    if e.is_timeout() {
        warn!("Embedding provider timed out: {e}");
        AttemptError::Fatal(EmbeddingError::ProviderTimeout)
    } else if e.is_connect() {
        warn!("Embedding provider unreachable: {e}");
        AttemptError::Transient(EmbeddingError::ProviderUnavailable(format!(
            "Could not reach embedding provider: {e}"
        )))
    } else {
        AttemptError::Fatal(EmbeddingError::ProviderUnavailable(format!(
            "Embedding provider request failed: {e}"
        )))
    }
}

/// Parses a provider response body into a vector of exactly `EMBEDDING_DIM` finite values.
fn parse_embedding(body: &str) -> Result<Embedding, EmbeddingError> {
    let payload: EmbedPayload = serde_json::from_str(body).map_err(|e| {
        EmbeddingError::InvalidResponse(format!("expected a numeric array: {e}"))
    })?;

    let vector = match payload {
        EmbedPayload::Flat(v) => v,
        EmbedPayload::Nested(mut batch) => {
            if batch.len() != 1 {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "expected one vector, got {}",
                    batch.len()
                )));
            }
            batch.remove(0)
        }
    };

    if vector.len() != EMBEDDING_DIM {
        return Err(EmbeddingError::InvalidResponse(format!(
            "expected {EMBEDDING_DIM} dimensions, got {}",
            vector.len()
        )));
    }

    if !vector.iter().all(|x| x.is_finite()) {
        return Err(EmbeddingError::InvalidResponse(
            "vector contains non-finite values".to_string(),
        ));
    }

    Ok(vector)
}
