use crate::presentation::http::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    storage: &'static str,
    database: &'static str,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (storage, db_status) = match &state.db {
        Some(db) => match sqlx::query("SELECT 1").execute(db).await {
            Ok(_) => ("postgres", "up"),
            Err(e) => {
                tracing::error!("Health check failed: Database unreachable: {}", e);
                ("postgres", "down")
            }
        },
        None => ("memory", "up"),
    };

    let healthy = db_status == "up";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" },
        storage,
        database: db_status,
        version: env!("CARGO_PKG_VERSION"),
    };
    let code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (code, Json(response))
}
