//! Deterministic in-process `EmbeddingProvider` for tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{Embedding, EmbeddingError, EmbeddingProvider, EMBEDDING_DIM};

type Responder = Box<dyn Fn(&str) -> Result<Embedding, EmbeddingError> + Send + Sync>;

/// Answers every call with `respond(text)` and counts the calls.
pub struct FakeEmbedder {
    respond: Responder,
    calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Result<Embedding, EmbeddingError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
        }
    }

    /// Hashed bag-of-words vectors: texts sharing vocabulary land close together.
    pub fn bag_of_words() -> Self {
        Self::new(|text| Ok(bag_of_words(text)))
    }

    pub fn failing(error: fn() -> EmbeddingError) -> Self {
        Self::new(move |_| Err(error()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(text)
    }
}

fn bag_of_words(text: &str) -> Embedding {
    let mut vector = vec![0.0_f32; EMBEDDING_DIM];
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 3)
    {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        vector[(hasher.finish() % EMBEDDING_DIM as u64) as usize] += 1.0;
    }
    vector
}
