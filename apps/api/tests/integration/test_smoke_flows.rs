use super::helpers::{
    create_comment, create_post, empty_request, expect_status, json_request, read_json, register,
    send, spawn_app, unique_email, unique_username, vote,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn smoke_register_login_post_comment_and_vote() {
    let app = spawn_app().await;

    let health = send(&app.app, empty_request("GET", "/health", None)).await;
    let health: Value = read_json(expect_status(health, StatusCode::OK).await).await;
    assert_eq!(health["storage"], "memory");

    let email = unique_email("smoke");
    let username = unique_username("smoke");
    let register_req = json_request(
        "POST",
        "/api/v1/auth/register",
        None,
        json!({
            "email": email,
            "password": "StrongSmokePass123!",
            "username": username,
            "display_name": "Smoke Rider"
        }),
    );
    expect_status(send(&app.app, register_req).await, StatusCode::CREATED).await;

    let login_req = json_request(
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": email.to_uppercase(), "password": "StrongSmokePass123!" }),
    );
    let login_res = expect_status(send(&app.app, login_req).await, StatusCode::OK).await;
    let login: Value = read_json(login_res).await;
    let token = login["token"].as_str().expect("missing token");
    assert_eq!(login["profile"]["username"], username.as_str());

    let me_res = send(&app.app, empty_request("GET", "/api/v1/auth/me", Some(token))).await;
    let me: Value = read_json(expect_status(me_res, StatusCode::OK).await).await;
    assert_eq!(me["username"], username.as_str());

    let author = register(&app.app, "author").await;
    let post = create_post(&app.app, &author, "Smoke test post", "discussion").await;
    let post_id = post["id"].as_str().unwrap();
    create_comment(&app.app, &author, post_id, "First!", None).await;

    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/vote", post_id),
        Some(token),
        json!({ "direction": "up" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::OK).await;

    let view_res = send(
        &app.app,
        empty_request("GET", &format!("/api/v1/posts/{}", post_id), Some(token)),
    )
    .await;
    let view: Value = read_json(expect_status(view_res, StatusCode::OK).await).await;
    assert_eq!(view["votes"], 1);
    assert_eq!(view["user_vote"], "up");
    assert_eq!(view["comment_count"], 1);

    let second = register(&app.app, "second").await;
    let downvote = vote(
        &app.app,
        &second,
        &format!("/api/v1/posts/{}/vote", post_id),
        json!({ "direction": "down" }),
    )
    .await;
    assert_eq!(downvote["total_votes"], 0);
}

#[tokio::test]
async fn duplicate_registration_conflicts_and_bad_passwords_are_rejected() {
    let app = spawn_app().await;
    let email = unique_email("dupe");
    let body = json!({
        "email": email,
        "password": "DragonRider123!",
        "username": unique_username("dupe")
    });

    let req = json_request("POST", "/api/v1/auth/register", None, body.clone());
    expect_status(send(&app.app, req).await, StatusCode::CREATED).await;
    let req = json_request("POST", "/api/v1/auth/register", None, body);
    expect_status(send(&app.app, req).await, StatusCode::CONFLICT).await;

    let req = json_request(
        "POST",
        "/api/v1/auth/login",
        None,
        json!({ "email": email, "password": "WrongPassword1!" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::UNAUTHORIZED).await;

    let req = json_request(
        "POST",
        "/api/v1/auth/register",
        None,
        json!({
            "email": unique_email("short"),
            "password": "short",
            "username": unique_username("short")
        }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = spawn_app().await;
    let res = send(&app.app, empty_request("GET", "/api/v1/dragons/classes", None)).await;
    let res = expect_status(res, StatusCode::OK).await;
    assert!(res.headers().contains_key("x-request-id"));
}
