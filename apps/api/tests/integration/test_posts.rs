use super::helpers::{
    create_comment, create_post, empty_request, expect_status, json_request, read_json, register,
    send, spawn_app, vote,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn listing_is_newest_first_and_paginated() {
    let app = spawn_app().await;
    let user = register(&app.app, "lister").await;
    for title in ["First entry", "Second entry", "Third entry"] {
        create_post(&app.app, &user, title, "discussion").await;
    }

    let uri = format!("/api/v1/posts?page=1&limit=2&author={}", user.username);
    let res = send(&app.app, empty_request("GET", &uri, None)).await;
    let page: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["total_pages"], 2);
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["title"], "Third entry");
    assert_eq!(items[1]["title"], "Second entry");
    assert_eq!(items[0]["comment_count"], 0);
    assert_eq!(items[0]["author"]["username"], user.username);

    let uri = format!("/api/v1/posts?page=2&limit=2&author={}", user.username);
    let res = send(&app.app, empty_request("GET", &uri, None)).await;
    let page: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(page["items"][0]["title"], "First entry");
}

#[tokio::test]
async fn listing_filters_by_type() {
    let app = spawn_app().await;
    let user = register(&app.app, "filter").await;
    create_post(&app.app, &user, "A theory post", "theory").await;
    create_post(&app.app, &user, "An art post", "art").await;

    let uri = format!("/api/v1/posts?type=art&author={}", user.username);
    let res = send(&app.app, empty_request("GET", &uri, None)).await;
    let page: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["type"], "art");
}

#[tokio::test]
async fn create_requires_auth_and_valid_fields() {
    let app = spawn_app().await;
    let user = register(&app.app, "creator").await;
    let body = json!({ "title": "Valid title", "content": "Body", "type": "news" });

    let req = json_request("POST", "/api/v1/posts", None, body);
    expect_status(send(&app.app, req).await, StatusCode::UNAUTHORIZED).await;

    let req = json_request(
        "POST",
        "/api/v1/posts",
        Some(&user.token),
        json!({ "title": "No", "content": "Body", "type": "news" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;

    let req = json_request(
        "POST",
        "/api/v1/posts",
        Some(&user.token),
        json!({ "title": "Unknown type", "content": "Body", "type": "rumour" }),
    );
    let status = send(&app.app, req).await.status();
    assert!(status.is_client_error(), "unexpected status {}", status);
}

#[tokio::test]
async fn edits_never_touch_the_cached_tally() {
    let app = spawn_app().await;
    let author = register(&app.app, "editor").await;
    let voter = register(&app.app, "voter").await;
    let post = create_post(&app.app, &author, "Tally safety", "theory").await;
    let post_id = post["id"].as_str().unwrap();
    vote(
        &app.app,
        &voter,
        &format!("/api/v1/posts/{}/vote", post_id),
        json!({ "direction": "up" }),
    )
    .await;

    let req = json_request(
        "PATCH",
        &format!("/api/v1/posts/{}", post_id),
        Some(&author.token),
        json!({ "title": "Tally safety, revised", "votes": 500 }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let updated: Value = read_json(res).await;
    assert_eq!(updated["title"], "Tally safety, revised");
    assert_eq!(updated["votes"], 1);
}

#[tokio::test]
async fn only_the_author_may_delete_and_comments_go_with_the_post() {
    let app = spawn_app().await;
    let author = register(&app.app, "deleter").await;
    let other = register(&app.app, "bystander").await;
    let post = create_post(&app.app, &author, "Short lived", "news").await;
    let post_id = post["id"].as_str().unwrap();
    create_comment(&app.app, &other, post_id, "Nice", None).await;

    let uri = format!("/api/v1/posts/{}", post_id);
    let req = empty_request("DELETE", &uri, Some(&other.token));
    expect_status(send(&app.app, req).await, StatusCode::FORBIDDEN).await;

    let req = empty_request("DELETE", &uri, Some(&author.token));
    expect_status(send(&app.app, req).await, StatusCode::NO_CONTENT).await;

    let req = empty_request("GET", &uri, None);
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
    let req = empty_request("GET", &format!("{}/comments", uri), None);
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn profile_counts_follows_and_posts() {
    let app = spawn_app().await;
    let hiccup = register(&app.app, "hiccup").await;
    let astrid = register(&app.app, "astrid").await;
    create_post(&app.app, &hiccup, "Flight log", "news").await;

    let follow_uri = format!("/api/v1/profiles/{}/follow", hiccup.username);
    let req = empty_request("POST", &follow_uri, Some(&astrid.token));
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let follow: Value = read_json(res).await;
    assert_eq!(follow["following"], true);
    assert_eq!(follow["follower_count"], 1);

    let req = empty_request(
        "GET",
        &format!("/api/v1/profiles/{}", hiccup.username),
        Some(&astrid.token),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let profile: Value = read_json(res).await;
    assert_eq!(profile["id"], hiccup.id.as_str());
    assert_eq!(profile["follower_count"], 1);
    assert_eq!(profile["following_count"], 0);
    assert_eq!(profile["post_count"], 1);
    assert_eq!(profile["is_following"], true);

    let req = empty_request("POST", &follow_uri, Some(&astrid.token));
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let unfollow: Value = read_json(res).await;
    assert_eq!(unfollow["following"], false);
    assert_eq!(unfollow["follower_count"], 0);

    let self_follow = empty_request("POST", &follow_uri, Some(&hiccup.token));
    expect_status(send(&app.app, self_follow).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn own_profile_can_be_updated() {
    let app = spawn_app().await;
    let user = register(&app.app, "updater").await;

    let req = json_request(
        "PATCH",
        "/api/v1/me/profile",
        Some(&user.token),
        json!({ "bio": "Dragon trainer", "location": "Berk" }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let profile: Value = read_json(res).await;
    assert_eq!(profile["bio"], "Dragon trainer");
    assert_eq!(profile["location"], "Berk");

    let req = empty_request("GET", "/api/v1/me/profile", None);
    expect_status(send(&app.app, req).await, StatusCode::UNAUTHORIZED).await;
}
