// Resume evaluation: embeddings → cosine score → keyword overlap → narrative report.
// All provider calls go through `EmbeddingProvider`; nothing here touches the network directly.

pub mod evaluator;
pub mod handlers;
pub mod keywords;
pub mod report;
pub mod similarity;

pub use evaluator::{evaluate, EvaluationError, EvaluationRequest, EvaluationResult};
