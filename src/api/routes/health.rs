use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::{ApiError, SUCCESS};
use crate::storage::StorageError;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub entries: u64,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let store = state.leaderboard.store();
    if !store.health_check().await? {
        return Err(StorageError::Unavailable(format!("{} health check failed", store.name())).into());
    }

    Ok(Json(HealthResponse {
        status: SUCCESS,
        store: store.name(),
        entries: store.count().await?,
    }))
}
