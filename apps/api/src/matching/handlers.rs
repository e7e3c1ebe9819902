//! Axum route handlers for the swipe API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::engine::{LikeOutcome, MatchSummary};
use crate::models::like::{LikeRow, Role};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LikeRequest {
    pub sender_user_id: Uuid,
    pub receiver_user_id: Uuid,
    pub sender_type: Role,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Serialize)]
pub struct MatchListResponse {
    pub matches: Vec<MatchSummary>,
}

#[derive(Serialize)]
pub struct PendingLikesResponse {
    pub likes: Vec<LikeRow>,
}

/// POST /api/v1/likes
pub async fn handle_record_like(
    State(state): State<AppState>,
    Json(req): Json<LikeRequest>,
) -> Result<Json<LikeOutcome>, AppError> {
    if req.sender_user_id == req.receiver_user_id {
        return Err(AppError::Validation(
            "sender_user_id and receiver_user_id must differ".to_string(),
        ));
    }

    let outcome = state
        .engine
        .record_like(req.sender_user_id, req.receiver_user_id, req.sender_type)
        .await?;
    Ok(Json(outcome))
}

/// GET /api/v1/matches
pub async fn handle_list_matches(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<MatchListResponse>, AppError> {
    let matches = state.engine.match_summaries(params.user_id).await?;
    Ok(Json(MatchListResponse { matches }))
}

/// GET /api/v1/likes/incoming
pub async fn handle_pending_likes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<PendingLikesResponse>, AppError> {
    let likes = state.engine.list_pending_likes(params.user_id).await?;
    Ok(Json(PendingLikesResponse { likes }))
}
