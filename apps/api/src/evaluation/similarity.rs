//! Cosine similarity between two embeddings and its 0–100 match score.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimilarityError {
    #[error("Embedding dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("Cannot compare a zero-magnitude embedding")]
    DegenerateVector,
}

/// dot(a, b) / (‖a‖·‖b‖), in [-1, 1].
///
/// Never returns NaN: mismatched lengths and zero-magnitude vectors are errors.
/// Accumulates in f64 so self-similarity lands on 1.0 for typical embeddings.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SimilarityError> {
    if a.len() != b.len() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(SimilarityError::DegenerateVector);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0) as f32)
}

/// Maps a similarity to an integer score: `similarity * 100`, clamped to [0, 100], rounded.
pub fn to_score(similarity: f32) -> u8 {
    if similarity.is_nan() {
        return 0;
    }
    (similarity * 100.0).clamp(0.0, 100.0).round() as u8
}
