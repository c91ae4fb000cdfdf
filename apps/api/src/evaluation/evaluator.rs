//! Validates a request and runs the scoring pipeline, returning one complete result or an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::embedding::{EmbeddingError, EmbeddingProvider};
use crate::evaluation::keywords::extract_keywords;
use crate::evaluation::report::{generate_report, Verdict};
use crate::evaluation::similarity::{cosine_similarity, to_score, SimilarityError};

/// Minimum length, in characters after trimming, of either text.
pub const MIN_TEXT_CHARS: usize = 50;

/// A validated input field. `Display` gives the name used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    JobDescription,
    Resume,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::JobDescription => f.write_str("Job description"),
            Field::Resume => f.write_str("Resume"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("{0} is required")]
    MissingField(Field),

    #[error("{0} is too short. Please provide more details.")]
    TooShort(Field),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Similarity(#[from] SimilarityError),
}

impl EvaluationError {
    /// Client-caused errors, raised before any provider call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EvaluationError::MissingField(_) | EvaluationError::TooShort(_)
        )
    }
}

/// Body of `POST /evaluate`. Fields are optional so a missing key is reported by name
/// instead of as a generic deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationRequest {
    pub job_description: Option<String>,
    pub resume: Option<String>,
}

/// Response body of a successful evaluation. Built once, never partially populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub match_score: u8,
    pub verdict: Verdict,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub reasons_for: Vec<String>,
    pub reasons_against: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First failure wins: missing job description, missing resume, short job description,
/// short resume. Returns both texts trimmed.
fn validate(request: &EvaluationRequest) -> Result<(&str, &str), EvaluationError> {
    let job_description = non_blank(request.job_description.as_deref())
        .ok_or(EvaluationError::MissingField(Field::JobDescription))?;
    let resume = non_blank(request.resume.as_deref())
        .ok_or(EvaluationError::MissingField(Field::Resume))?;

    if job_description.chars().count() < MIN_TEXT_CHARS {
        return Err(EvaluationError::TooShort(Field::JobDescription));
    }
    if resume.chars().count() < MIN_TEXT_CHARS {
        return Err(EvaluationError::TooShort(Field::Resume));
    }

    Ok((job_description, resume))
}

/// Runs one evaluation.
///
/// Validation errors return before the provider is called. Both embeddings are
/// requested concurrently and the first failure is surfaced.
pub async fn evaluate(
    embedder: &dyn EmbeddingProvider,
    request: &EvaluationRequest,
) -> Result<EvaluationResult, EvaluationError> {
    let (job_description, resume) = validate(request)?;

    let (job_embedding, resume_embedding) =
        tokio::try_join!(embedder.embed(job_description), embedder.embed(resume))?;

    let similarity = cosine_similarity(&job_embedding, &resume_embedding)?;
    let match_score = to_score(similarity);

    let job_keywords = extract_keywords(job_description);
    let resume_keywords = extract_keywords(resume);
    let report = generate_report(match_score, &job_keywords, &resume_keywords);

    info!(
        match_score,
        verdict = ?report.verdict,
        job_chars = job_description.chars().count(),
        resume_chars = resume.chars().count(),
        "Evaluation complete"
    );

    Ok(EvaluationResult {
        match_score,
        verdict: report.verdict,
        strengths: report.strengths,
        gaps: report.gaps,
        reasons_for: report.reasons_for,
        reasons_against: report.reasons_against,
        improvement_suggestions: report.improvement_suggestions,
    })
}
