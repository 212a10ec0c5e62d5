use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;
use wyrmlore_api::{
    config::{Config, StorageBackend},
    infrastructure::memory::MemoryStore,
    presentation::http::{routes::create_router, state::AppState},
};

pub struct TestApp {
    pub app: Router,
}

pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

fn build_config() -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        database_url: None,
        database_max_connections: 1,
        redis_url: None,
        host: "127.0.0.1".to_string(),
        port: 0,
        jwt_secret: "test-jwt-secret".to_string(),
        jwt_ttl_days: 1,
        // Lowest cost bcrypt accepts; keeps registration fast.
        bcrypt_cost: 4,
        write_rate_limit_per_minute: 0,
        comment_cooldown_seconds: 0,
        encyclopedia_cache_ttl_seconds: 0,
        allowed_origins: Vec::new(),
        ignore_missing_migrations: true,
    }
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    store.seed_encyclopedia().await;
    let state = AppState::in_memory(build_config(), store);

    TestApp {
        app: create_router(state),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(req).await.expect("request failed")
}

pub async fn read_json<T: DeserializeOwned>(res: axum::response::Response) -> T {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("failed to parse json")
}

pub async fn read_text(res: axum::response::Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    String::from_utf8(bytes.to_vec()).expect("invalid utf8")
}

pub async fn expect_status(
    res: axum::response::Response,
    expected: StatusCode,
) -> axum::response::Response {
    let actual = res.status();

    if actual == expected {
        return res;
    }

    let body = read_text(res).await;
    panic!(
        "HTTP status mismatch. Expected {}, got {}. Response body: {}",
        expected, actual, body
    );
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::now_v7())
}

/// Usernames are capped at 30 characters, so only a slice of the id is used.
pub fn unique_username(prefix: &str) -> String {
    let suffix = Uuid::now_v7().simple().to_string();
    format!("{}_{}", prefix, &suffix[suffix.len() - 12..])
}

/// Build a JSON request, optionally authenticated.
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("failed to build request")
}

pub async fn register(app: &Router, prefix: &str) -> TestUser {
    let username = unique_username(prefix);
    let req = json_request(
        "POST",
        "/api/v1/auth/register",
        None,
        json!({
            "email": unique_email(prefix),
            "password": "DragonRider123!",
            "username": username,
            "display_name": format!("{} rider", prefix)
        }),
    );
    let res = expect_status(send(app, req).await, StatusCode::CREATED).await;
    let body: Value = read_json(res).await;
    TestUser {
        id: body["profile"]["id"]
            .as_str()
            .expect("missing profile id")
            .to_string(),
        username,
        token: body["token"].as_str().expect("missing token").to_string(),
    }
}

pub async fn create_post(app: &Router, user: &TestUser, title: &str, post_type: &str) -> Value {
    let req = json_request(
        "POST",
        "/api/v1/posts",
        Some(&user.token),
        json!({
            "title": title,
            "content": "Night Furies can see in complete darkness.",
            "type": post_type,
            "tags": ["night-fury", "theory"]
        }),
    );
    let res = expect_status(send(app, req).await, StatusCode::CREATED).await;
    read_json(res).await
}

pub async fn create_comment(
    app: &Router,
    user: &TestUser,
    post_id: &str,
    content: &str,
    parent_id: Option<&str>,
) -> Value {
    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/comments", post_id),
        Some(&user.token),
        json!({ "content": content, "parent_id": parent_id }),
    );
    let res = expect_status(send(app, req).await, StatusCode::CREATED).await;
    read_json(res).await
}

pub async fn vote(
    app: &Router,
    user: &TestUser,
    uri: &str,
    body: Value,
) -> Value {
    let req = json_request("POST", uri, Some(&user.token), body);
    let res = expect_status(send(app, req).await, StatusCode::OK).await;
    read_json(res).await
}
