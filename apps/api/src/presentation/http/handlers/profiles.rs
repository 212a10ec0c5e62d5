use axum::{
    Json,
    extract::{Path, State},
    http::HeaderMap,
};

use crate::{
    application::profiles::dto::{FollowResponse, UpdateProfileRequest},
    domain::{
        dragon::entity::Favorites,
        profile::entity::{Profile, ProfileView},
    },
    presentation::http::{errors::AppError, middleware::user::viewer_id, state::AppState},
};

pub async fn get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<ProfileView>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.profiles.by_username(viewer, &username).await?))
}

pub async fn toggle_follow(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Result<Json<FollowResponse>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.profiles.toggle_follow(caller, &username).await?))
}

pub async fn get_my_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.profiles.me(caller).await?))
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.profiles.update_me(caller, body).await?))
}

pub async fn my_favorites(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Favorites>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.encyclopedia.favorites(caller).await?))
}
