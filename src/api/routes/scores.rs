use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, SUCCESS};
use crate::models::parse_submission;

#[derive(Debug, Serialize)]
pub struct SaveScoreResponse {
    pub status: &'static str,
    pub received_name: String,
    pub received_email: String,
    pub received_score: i64,
}

/// Validate a `{name, email, score}` body and store the score.
///
/// The raw body is taken so that a missing or malformed body is reported
/// as "No data" rather than as an extractor rejection.
pub async fn save_score(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SaveScoreResponse>, ApiError> {
    let entry = parse_submission(&body)?;
    let saved = state.leaderboard.submit(entry).await?;

    Ok(Json(SaveScoreResponse {
        status: SUCCESS,
        received_name: saved.name,
        received_email: saved.id.into_inner(),
        received_score: saved.score,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::api::routes::test_support::{app, memory_state, post_json, state_with};
    use crate::models::PlayerId;
    use crate::ranking::tests::UnreachableStore;
    use crate::storage::RankingStore;

    #[tokio::test]
    async fn test_save_score_echoes_values() {
        let (store, state) = memory_state();
        let (status, json) = post_json(
            app(state),
            "/api/saveScore",
            r#"{"name": "Ada", "email": "ada@example.com", "score": 42}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({
                "status": "success",
                "received_name": "Ada",
                "received_email": "ada@example.com",
                "received_score": 42
            })
        );
        assert_eq!(
            store.score_of(&PlayerId::from("ada@example.com")).await,
            Some(42)
        );
    }

    #[tokio::test]
    async fn test_save_score_coerces_string_score() {
        let (_, state) = memory_state();
        let (status, json) = post_json(
            app(state),
            "/api/saveScore",
            r#"{"name": "Ada", "email": "ada@example.com", "score": "17"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["received_score"], 17);
    }

    #[tokio::test]
    async fn test_save_score_no_body() {
        let (_, state) = memory_state();
        let (status, json) = post_json(app(state), "/api/saveScore", "").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "No data");
    }

    #[tokio::test]
    async fn test_save_score_missing_fields() {
        let bodies = [
            r#"{"email": "ada@example.com", "score": 1}"#,
            r#"{"name": "Ada", "score": 1}"#,
            r#"{"name": "Ada", "email": "ada@example.com"}"#,
        ];
        for body in bodies {
            let (store, state) = memory_state();
            let (status, json) = post_json(app(state), "/api/saveScore", body).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(json["message"], "Not enough data", "body: {}", body);
            assert_eq!(store.count().await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_save_score_non_integer() {
        let (store, state) = memory_state();
        let (status, json) = post_json(
            app(state),
            "/api/saveScore",
            r#"{"name": "Ada", "email": "ada@example.com", "score": "abc"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Score must be an integer");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_save_score_last_write_wins() {
        let (store, state) = memory_state();
        for score in [50, 30] {
            let body = json!({"name": "Ada", "email": "ada@example.com", "score": score});
            let (status, _) =
                post_json(app(state.clone()), "/api/saveScore", &body.to_string()).await;
            assert_eq!(status, StatusCode::OK);
        }

        assert_eq!(
            store.score_of(&PlayerId::from("ada@example.com")).await,
            Some(30)
        );
    }

    #[tokio::test]
    async fn test_save_score_store_down() {
        let state = state_with(Arc::new(UnreachableStore));
        let (status, json) = post_json(
            app(state),
            "/api/saveScore",
            r#"{"name": "Ada", "email": "ada@example.com", "score": 42}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Database error");
    }

    #[tokio::test]
    async fn test_validation_runs_before_store() {
        // An invalid body never reaches the (failing) store
        let state = state_with(Arc::new(UnreachableStore));
        let (status, json) =
            post_json(app(state), "/api/saveScore", r#"{"name": "Ada"}"#).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Not enough data");
    }
}
