use super::helpers::{
    create_comment, create_post, empty_request, expect_status, json_request, read_json, register,
    send, spawn_app, vote,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

async fn fetch_threads(app: &axum::Router, post_id: &str, token: Option<&str>) -> Value {
    let res = send(
        app,
        empty_request("GET", &format!("/api/v1/posts/{}/comments", post_id), token),
    )
    .await;
    read_json(expect_status(res, StatusCode::OK).await).await
}

#[tokio::test]
async fn replies_attach_to_their_parent_oldest_first() {
    let app = spawn_app().await;
    let user = register(&app.app, "threader").await;
    let post = create_post(&app.app, &user, "Thread ordering", "discussion").await;
    let post_id = post["id"].as_str().unwrap();

    let a = create_comment(&app.app, &user, post_id, "A", None).await;
    let a_id = a["id"].as_str().unwrap();
    let b = create_comment(&app.app, &user, post_id, "B", Some(a_id)).await;
    let c = create_comment(&app.app, &user, post_id, "C", Some(a_id)).await;
    let d = create_comment(&app.app, &user, post_id, "D", None).await;

    let body = fetch_threads(&app.app, post_id, None).await;
    assert_eq!(body["total"], 4);
    let threads = body["threads"].as_array().expect("threads should be an array");
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0]["id"], a["id"]);
    assert_eq!(threads[1]["id"], d["id"]);

    let replies = threads[0]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["id"], b["id"]);
    assert_eq!(replies[1]["id"], c["id"]);
    assert!(threads[1]["replies"].as_array().unwrap().is_empty());
    assert!(body["orphans"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn reply_to_a_reply_attaches_under_that_reply() {
    let app = spawn_app().await;
    let user = register(&app.app, "nester").await;
    let post = create_post(&app.app, &user, "Nested replies", "discussion").await;
    let post_id = post["id"].as_str().unwrap();

    let top = create_comment(&app.app, &user, post_id, "Top", None).await;
    let reply = create_comment(&app.app, &user, post_id, "Reply", top["id"].as_str()).await;
    let nested = create_comment(&app.app, &user, post_id, "Nested", reply["id"].as_str()).await;

    let body = fetch_threads(&app.app, post_id, None).await;
    let threads = body["threads"].as_array().unwrap();
    assert_eq!(threads.len(), 1);
    let first_reply = &threads[0]["replies"][0];
    assert_eq!(first_reply["id"], reply["id"]);
    assert_eq!(first_reply["replies"][0]["id"], nested["id"]);
}

#[tokio::test]
async fn replies_of_a_deleted_comment_surface_as_orphans() {
    let app = spawn_app().await;
    let user = register(&app.app, "orphaner").await;
    let post = create_post(&app.app, &user, "Deleting parents", "discussion").await;
    let post_id = post["id"].as_str().unwrap();

    let parent = create_comment(&app.app, &user, post_id, "Parent", None).await;
    let child = create_comment(&app.app, &user, post_id, "Child", parent["id"].as_str()).await;

    let req = empty_request(
        "DELETE",
        &format!("/api/v1/comments/{}", parent["id"].as_str().unwrap()),
        Some(&user.token),
    );
    expect_status(send(&app.app, req).await, StatusCode::NO_CONTENT).await;

    let body = fetch_threads(&app.app, post_id, None).await;
    assert!(body["threads"].as_array().unwrap().is_empty());
    let orphans = body["orphans"].as_array().unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0]["id"], child["id"]);
}

#[tokio::test]
async fn parent_from_another_post_is_rejected() {
    let app = spawn_app().await;
    let user = register(&app.app, "crosser").await;
    let first = create_post(&app.app, &user, "First post", "discussion").await;
    let second = create_post(&app.app, &user, "Second post", "discussion").await;
    let foreign = create_comment(&app.app, &user, first["id"].as_str().unwrap(), "Hi", None).await;

    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/comments", second["id"].as_str().unwrap()),
        Some(&user.token),
        json!({ "content": "Wrong thread", "parent_id": foreign["id"] }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let app = spawn_app().await;
    let user = register(&app.app, "blank").await;
    let post = create_post(&app.app, &user, "Blank comments", "discussion").await;

    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/comments", post["id"].as_str().unwrap()),
        Some(&user.token),
        json!({ "content": "   " }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn only_the_author_may_edit_a_comment() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let other = register(&app.app, "other").await;
    let post = create_post(&app.app, &author, "Edit rights", "discussion").await;
    let comment =
        create_comment(&app.app, &author, post["id"].as_str().unwrap(), "Original", None).await;
    let uri = format!("/api/v1/comments/{}", comment["id"].as_str().unwrap());

    let req = json_request("PATCH", &uri, Some(&other.token), json!({ "content": "Hijack" }));
    expect_status(send(&app.app, req).await, StatusCode::FORBIDDEN).await;

    let req = json_request("PATCH", &uri, Some(&author.token), json!({ "content": "Edited" }));
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let updated: Value = read_json(res).await;
    assert_eq!(updated["content"], "Edited");
}

#[tokio::test]
async fn viewer_vote_is_attached_to_each_comment() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let voter = register(&app.app, "voter").await;
    let post = create_post(&app.app, &author, "Viewer votes", "discussion").await;
    let post_id = post["id"].as_str().unwrap();
    let comment = create_comment(&app.app, &author, post_id, "Vote on me", None).await;

    vote(
        &app.app,
        &voter,
        &format!("/api/v1/comments/{}/vote", comment["id"].as_str().unwrap()),
        json!({ "direction": "up" }),
    )
    .await;

    let as_voter = fetch_threads(&app.app, post_id, Some(&voter.token)).await;
    assert_eq!(as_voter["threads"][0]["user_vote"], "up");
    assert_eq!(as_voter["threads"][0]["votes"], 1);
    assert_eq!(as_voter["threads"][0]["author"]["username"], author.username);

    let anonymous = fetch_threads(&app.app, post_id, None).await;
    assert_eq!(anonymous["threads"][0]["user_vote"], Value::Null);
}
