use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::{ApiError, NO_SCORES_MESSAGE, SUCCESS};
use crate::models::RankedEntry;

#[derive(Debug, Serialize)]
pub struct TopPlayerResponse {
    pub status: &'static str,
    pub message: String,
    pub player: Option<RankedEntry>,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub status: &'static str,
    pub message: String,
    pub leaderboard: Vec<RankedEntry>,
}

#[derive(Debug, Serialize)]
pub struct AllScoresResponse {
    pub status: &'static str,
    pub message: String,
    pub data: Vec<RankedEntry>,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    /// Window size; defaults to the configured leaderboard size
    pub limit: Option<u64>,
}

const LIMIT_ERROR_MESSAGE: &str = "Limit must be a positive integer";

fn listing_message(found: bool, found_message: &str) -> String {
    if found {
        found_message.to_string()
    } else {
        NO_SCORES_MESSAGE.to_string()
    }
}

pub async fn get_top1(State(state): State<AppState>) -> Result<Json<TopPlayerResponse>, ApiError> {
    let player = state.leaderboard.top_one().await?;

    Ok(Json(TopPlayerResponse {
        status: SUCCESS,
        message: listing_message(player.is_some(), "Top player retrieved"),
        player,
    }))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    params: Result<Query<LeaderboardParams>, QueryRejection>,
) -> Result<Json<LeaderboardResponse>, ApiError> {
    let limit = match params {
        Ok(Query(LeaderboardParams { limit: Some(0) })) | Err(_) => {
            return Err(ApiError::BadRequest(LIMIT_ERROR_MESSAGE.to_string()))
        }
        Ok(Query(params)) => params.limit,
    };
    let leaderboard = state.leaderboard.top(limit).await?;

    Ok(Json(LeaderboardResponse {
        status: SUCCESS,
        message: listing_message(!leaderboard.is_empty(), "Leaderboard retrieved"),
        leaderboard,
    }))
}

pub async fn get_all(State(state): State<AppState>) -> Result<Json<AllScoresResponse>, ApiError> {
    let data = state.leaderboard.all().await?;

    Ok(Json(AllScoresResponse {
        status: SUCCESS,
        message: listing_message(!data.is_empty(), "All scores retrieved"),
        data,
    }))
}
