use std::str::FromStr;

use anyhow::{bail, Context, Result};

pub const DEFAULT_EMBEDDING_API_URL: &str =
    "https://api-inference.huggingface.co/models/sentence-transformers/all-MiniLM-L6-v2";

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the embedding provider. Optional so the UI can still be served
    /// without one; every evaluation fails until it is set.
    pub huggingface_api_token: Option<String>,
    pub embedding_api_url: String,
    pub embedding_timeout_secs: u64,
    pub embedding_retry: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` passes the process environment.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let huggingface_api_token = lookup("HUGGINGFACE_API_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let embedding_timeout_secs: u64 = parse_or(&lookup, "EMBEDDING_TIMEOUT_SECS", 30)?;
        if embedding_timeout_secs == 0 {
            bail!("EMBEDDING_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            huggingface_api_token,
            embedding_api_url: lookup("EMBEDDING_API_URL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_API_URL.to_string()),
            embedding_timeout_secs,
            embedding_retry: parse_or(&lookup, "EMBEDDING_RETRY", true)?,
            port: parse_or(&lookup, "PORT", 5000)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}
