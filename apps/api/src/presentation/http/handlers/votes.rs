use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};
use uuid::Uuid;

use crate::{
    application::cast_vote::dto::CastVoteRequest,
    domain::vote::entity::{VoteOutcome, VoteTarget},
    presentation::http::{errors::AppError, middleware::user::viewer_id, state::AppState},
};

async fn cast(
    state: &AppState,
    headers: &HeaderMap,
    target: VoteTarget,
    body: CastVoteRequest,
) -> Result<Json<VoteOutcome>, AppError> {
    let voter = viewer_id(headers, &state.config.jwt_secret);
    Ok(Json(state.votes.execute(voter, target, body).await?))
}

async fn current(
    state: &AppState,
    headers: &HeaderMap,
    target: VoteTarget,
) -> Result<Json<VoteOutcome>, AppError> {
    let viewer = viewer_id(headers, &state.config.jwt_secret);
    Ok(Json(state.votes.state(viewer, target).await?))
}

pub async fn vote_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<CastVoteRequest>,
) -> Result<Json<VoteOutcome>, AppError> {
    cast(&state, &headers, VoteTarget::post(id), body).await
}

pub async fn post_vote_state(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteOutcome>, AppError> {
    current(&state, &headers, VoteTarget::post(id)).await
}

pub async fn vote_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<CastVoteRequest>,
) -> Result<Json<VoteOutcome>, AppError> {
    cast(&state, &headers, VoteTarget::comment(id), body).await
}

pub async fn comment_vote_state(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<VoteOutcome>, AppError> {
    current(&state, &headers, VoteTarget::comment(id)).await
}
