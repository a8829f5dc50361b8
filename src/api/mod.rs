//! REST API endpoints.
//!
//! Axum-based HTTP API for submitting scores and reading the leaderboard.
//! Every response body carries `status: "success" | "error"`; errors add a
//! `message`.

pub mod routes;
pub mod state;

use std::any::Any as PanicPayload;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::models::ValidationError;
use crate::storage::StorageError;
use state::AppState;

/// Message returned for store failures; the cause is only logged.
pub const STORAGE_ERROR_MESSAGE: &str = "Database error";

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Database error")]
    Storage(#[source] StorageError),

    #[error("{0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        error!("Ranking store failure: {}", err);
        ApiError::Storage(err)
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Storage(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorResponse {
            status: "error",
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Status value of every successful response.
pub const SUCCESS: &str = "success";

/// Message accompanying an empty listing.
pub const NO_SCORES_MESSAGE: &str = "No scores yet";

/// Build the application router.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/api/saveScore", post(routes::scores::save_score))
        .route("/api/getTop1", get(routes::leaderboard::get_top1))
        .route("/api/getLeaderboard", get(routes::leaderboard::get_leaderboard))
        .route("/api/getAll", get(routes::leaderboard::get_all))
        .route("/api/health", get(routes::health::health))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origin))
        .with_state(state)
}

/// CORS policy from a comma-separated origin list, `*` for any origin.
pub fn cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.trim() == "*" {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Report a handler panic as an internal error.
fn panic_response(err: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    error!("Request handler panicked: {}", details);
    ApiError::Internal(details).into_response()
}
