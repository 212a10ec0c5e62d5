use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};

use crate::presentation::http::{errors::AppError, middleware::user::viewer_id, state::AppState};

const WINDOW_SECONDS: u64 = 60;

fn extract_client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .unwrap_or("127.0.0.1")
        .to_string()
}

/// Throttle mutating requests per account, or per client IP when anonymous.
/// Reads pass through, as does everything when Redis is not configured.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limit = state.config.write_rate_limit_per_minute;
    let is_write = !matches!(
        *request.method(),
        Method::GET | Method::HEAD | Method::OPTIONS
    );
    let Some(limiter) = state.rate_limiter.as_ref().filter(|_| is_write && limit > 0) else {
        return Ok(next.run(request).await);
    };

    let key = match viewer_id(request.headers(), &state.config.jwt_secret) {
        Some(id) => format!("write:user:{id}"),
        None => format!("write:ip:{}", extract_client_ip(request.headers())),
    };
    if !limiter.check(&key, limit, WINDOW_SECONDS).await {
        return Err(AppError::RateLimited);
    }

    Ok(next.run(request).await)
}
