pub mod health;
pub mod index;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::evaluation::handlers;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route("/health", get(health::health_handler))
        .route("/evaluate", post(handlers::handle_evaluate))
        .fallback(not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::embedding::fake::FakeEmbedder;
    use crate::embedding::{EmbeddingError, EmbeddingProvider};
    use crate::evaluation::{report::Verdict, EvaluationResult};

    const JD: &str = "Senior Python Developer to design Flask services on AWS, \
         maintain Python Flask APIs on AWS Lambda and review code.";
    const RESUME: &str = "Python engineer: designed Flask services on AWS, maintained \
         Python Flask APIs on AWS Lambda, reviewed code for the team.";

    fn test_state(embedder: Arc<dyn EmbeddingProvider>) -> AppState {
        AppState {
            embedder,
            config: Config::from_source(|_| None).unwrap(),
        }
    }

    fn app_with(embedder: Arc<FakeEmbedder>) -> Router {
        build_router(test_state(embedder))
    }

    async fn post_json(app: Router, body: Value) -> Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/evaluate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_evaluate_returns_full_result() {
        let embedder = Arc::new(FakeEmbedder::bag_of_words());
        let response = post_json(
            app_with(embedder.clone()),
            json!({ "job_description": JD, "resume": RESUME }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        for key in [
            "match_score",
            "verdict",
            "strengths",
            "gaps",
            "reasons_for",
            "reasons_against",
            "improvement_suggestions",
        ] {
            assert!(body.get(key).is_some(), "missing {key}");
        }

        let result: EvaluationResult = serde_json::from_value(body).unwrap();
        assert!(result.match_score <= 100);
        assert_eq!(result.verdict, Verdict::from_score(result.match_score));
        assert_eq!(embedder.calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_job_description_is_400_naming_the_field() {
        let embedder = Arc::new(FakeEmbedder::bag_of_words());
        let response = post_json(
            app_with(embedder.clone()),
            json!({ "job_description": "", "resume": RESUME }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        let error = body["error"].as_str().unwrap().to_lowercase();
        assert!(error.contains("job description"), "got {error}");
        assert_eq!(embedder.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_resume_is_400() {
        let response = post_json(
            app_with(Arc::new(FakeEmbedder::bag_of_words())),
            json!({ "job_description": JD }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Resume is required");
    }

    #[tokio::test]
    async fn test_49_character_fields_are_too_short() {
        let short = "a".repeat(49);

        let response = post_json(
            app_with(Arc::new(FakeEmbedder::bag_of_words())),
            json!({ "job_description": short, "resume": RESUME }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.contains("too short"));
        assert!(error.starts_with("Job description"));

        let response = post_json(
            app_with(Arc::new(FakeEmbedder::bag_of_words())),
            json!({ "job_description": JD, "resume": short }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.contains("too short"));
        assert!(error.starts_with("Resume"));
    }

    #[tokio::test]
    async fn test_provider_timeout_is_500_without_result_fields() {
        let embedder = Arc::new(FakeEmbedder::failing(|| EmbeddingError::ProviderTimeout));
        let response = post_json(
            app_with(embedder),
            json!({ "job_description": JD, "resume": RESUME }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Evaluation failed: Embedding provider timed out");
        assert!(body.get("match_score").is_none());
        assert!(body.get("verdict").is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_400_with_error_body() {
        let response = app_with(Arc::new(FakeEmbedder::bag_of_words()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/evaluate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn test_index_and_health_are_served() {
        let app = app_with(Arc::new(FakeEmbedder::bag_of_words()));

        let index = app
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(index.status(), StatusCode::OK);

        let health = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(health.status(), StatusCode::OK);
        let body = body_json(health).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider_token_configured"], false);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_json() {
        let response = app_with(Arc::new(FakeEmbedder::bag_of_words()))
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Not found: /nope");
    }
}
