//! Axum route handlers for the Evaluation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::errors::AppError;
use crate::evaluation::{evaluate, EvaluationRequest, EvaluationResult};
use crate::state::AppState;

/// POST /evaluate
///
/// Scores a resume against a job description. Malformed JSON is reported in the
/// same `{ "error": ... }` shape as validation failures.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Result<Json<EvaluationResult>, AppError> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    })?;

    let result = evaluate(state.embedder.as_ref(), &request).await?;

    Ok(Json(result))
}
