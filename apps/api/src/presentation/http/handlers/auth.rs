use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    domain::{
        profile::{
            entity::{NewAccount, Profile},
            value_objects::{EmailAddress, Username},
        },
        shared::errors::DomainError,
    },
    presentation::http::{
        errors::AppError,
        middleware::user::{issue_user_token, viewer_id},
        state::AppState,
    },
};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8 to 128 characters"))]
    pub password: String,
    pub username: String,
    #[validate(length(max = 60, message = "Display name must be less than 60 characters"))]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub email: String,
    pub profile: Profile,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    body.validate().map_err(DomainError::from)?;
    let email = EmailAddress::new(body.email)
        .map_err(|_| AppError::ValidationError("Valid email is required".to_string()))?;
    let username = Username::new(body.username).map_err(|_| {
        AppError::ValidationError(
            "Username must be 3 to 30 letters, digits or underscores".to_string(),
        )
    })?;

    let password_hash = hash(&body.password, state.config.bcrypt_cost)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    let profile = state
        .profile_repo
        .create_account(NewAccount {
            email: email.value.clone(),
            password_hash,
            username: username.value,
            display_name: body
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        })
        .await?;
    tracing::info!(account_id = %profile.id, "account registered");

    let token = issue_user_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_days,
        profile.id,
        &email.value,
    )?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            email: email.value,
            profile,
        }),
    ))
}

pub async fn login_user(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = body.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let credentials = state
        .profile_repo
        .find_credentials(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&body.password, &credentials.password_hash)
        .map_err(|_| AppError::Internal("Password verification failed".to_string()))?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let profile = state
        .profile_repo
        .find_by_id(credentials.account_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let token = issue_user_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_days,
        credentials.account_id,
        &credentials.email,
    )?;

    Ok(Json(AuthResponse {
        token,
        email: credentials.email,
        profile,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Profile>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.profiles.me(caller).await?))
}
