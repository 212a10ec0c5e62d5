use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::{
    application::posts::dto::{CreatePostRequest, ListPostsQuery, UpdatePostRequest},
    domain::{
        post::entity::{Post, PostView},
        shared::pagination::PaginatedResponse,
    },
    presentation::http::{errors::AppError, middleware::user::viewer_id, state::AppState},
};

pub async fn list_posts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PaginatedResponse<PostView>>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.posts.list(viewer, query).await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<PostView>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.posts.get(viewer, id).await?))
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let author = viewer_id(&headers, &state.config.jwt_secret);
    let post = state.posts.create(author, body).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePostRequest>,
) -> Result<Json<Post>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.posts.update(caller, id, body).await?))
}

pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    state.posts.delete(caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
