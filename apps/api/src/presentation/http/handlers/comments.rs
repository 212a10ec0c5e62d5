use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::{
    application::comments::dto::{CreateCommentRequest, UpdateCommentRequest},
    domain::comment::{
        entity::{Comment, CommentView},
        threading::CommentThreads,
    },
    presentation::http::{errors::AppError, middleware::user::viewer_id, state::AppState},
};

pub async fn list_comments(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<Uuid>,
) -> Result<Json<CommentThreads<CommentView>>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.comments.threads(viewer, post_id).await?))
}

pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id): Path<Uuid>,
    Json(body): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let author = viewer_id(&headers, &state.config.jwt_secret);

    // One comment per user per cooldown window, when Redis is available.
    let cooldown = state.config.comment_cooldown_seconds;
    if let (Some(user_id), Some(limiter)) = (author, state.rate_limiter.as_ref()) {
        if cooldown > 0
            && !limiter
                .cooldown(&format!("comment:{user_id}"), cooldown)
                .await
        {
            return Err(AppError::RateLimited);
        }
    }

    let comment = state.comments.create(author, post_id, body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.comments.update(caller, id, body).await?))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    state.comments.delete(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
