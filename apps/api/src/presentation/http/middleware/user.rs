use axum::http::{HeaderMap, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::presentation::http::errors::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// Account id.
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

pub fn decode_optional_user_claims(headers: &HeaderMap, secret: &str) -> Option<UserClaims> {
    let token = extract_bearer_token(headers)?;
    decode::<UserClaims>(
        &token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|d| d.claims)
}

/// Caller identity, or `None` for anonymous callers and unusable tokens.
pub fn viewer_id(headers: &HeaderMap, secret: &str) -> Option<Uuid> {
    decode_optional_user_claims(headers, secret).and_then(|claims| Uuid::parse_str(&claims.sub).ok())
}

pub fn issue_user_token(
    secret: &str,
    ttl_days: i64,
    account_id: Uuid,
    email: &str,
) -> Result<String, AppError> {
    let claims = UserClaims {
        sub: account_id.to_string(),
        email: email.to_string(),
        exp: (Utc::now() + Duration::days(ttl_days)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}
