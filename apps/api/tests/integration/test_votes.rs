use super::helpers::{
    create_comment, create_post, empty_request, expect_status, json_request, read_json, register,
    send, spawn_app, vote,
};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn tally_tracks_three_up_one_down() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let post = create_post(&app.app, &author, "Where do Night Furies nest?", "theory").await;
    let post_id = post["id"].as_str().expect("missing post id");
    let vote_uri = format!("/api/v1/posts/{}/vote", post_id);

    for (i, direction) in ["up", "up", "up", "down"].into_iter().enumerate() {
        let voter = register(&app.app, &format!("voter{}", i)).await;
        vote(&app.app, &voter, &vote_uri, json!({ "direction": direction })).await;
    }

    let res = send(&app.app, empty_request("GET", &vote_uri, None)).await;
    let state: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(state["total_votes"], 2);
    assert_eq!(state["user_vote"], Value::Null);

    let res = send(
        &app.app,
        empty_request("GET", &format!("/api/v1/posts/{}", post_id), None),
    )
    .await;
    let view: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(view["votes"], 2, "cached votes must match the recount");
}

#[tokio::test]
async fn flipping_a_vote_moves_the_tally_by_two() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let voter = register(&app.app, "voter").await;
    let post = create_post(&app.app, &author, "Gronckle diets", "discussion").await;
    let vote_uri = format!("/api/v1/posts/{}/vote", post["id"].as_str().unwrap());

    let up = vote(&app.app, &voter, &vote_uri, json!({ "direction": "up" })).await;
    assert_eq!(up["total_votes"], 1);
    assert_eq!(up["user_vote"], "up");

    let down = vote(&app.app, &voter, &vote_uri, json!({ "direction": "down" })).await;
    assert_eq!(down["total_votes"], -1);
    assert_eq!(down["user_vote"], "down");

    let res = send(&app.app, empty_request("GET", &vote_uri, Some(&voter.token))).await;
    let state: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(state["total_votes"], -1);
    assert_eq!(state["user_vote"], "down");
}

#[tokio::test]
async fn repeating_a_vote_is_idempotent_and_none_clears_it() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let voter = register(&app.app, "voter").await;
    let post = create_post(&app.app, &author, "Berk weather report", "news").await;
    let vote_uri = format!("/api/v1/posts/{}/vote", post["id"].as_str().unwrap());

    vote(&app.app, &voter, &vote_uri, json!({ "direction": "up" })).await;
    let again = vote(&app.app, &voter, &vote_uri, json!({ "direction": "up" })).await;
    assert_eq!(again["total_votes"], 1);

    let cleared = vote(&app.app, &voter, &vote_uri, json!({ "direction": "none" })).await;
    assert_eq!(cleared["total_votes"], 0);
    assert_eq!(cleared["user_vote"], Value::Null);

    // Clearing with nothing held is a no-op.
    let noop = vote(&app.app, &voter, &vote_uri, json!({ "direction": null })).await;
    assert_eq!(noop["total_votes"], 0);
}

#[tokio::test]
async fn toggle_repeat_clears_the_held_direction() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let voter = register(&app.app, "voter").await;
    let post = create_post(&app.app, &author, "Fan art of Meatlug", "art").await;
    let vote_uri = format!("/api/v1/posts/{}/vote", post["id"].as_str().unwrap());

    let first = vote(
        &app.app,
        &voter,
        &vote_uri,
        json!({ "direction": "up", "toggle": true }),
    )
    .await;
    assert_eq!(first["user_vote"], "up");

    let second = vote(
        &app.app,
        &voter,
        &vote_uri,
        json!({ "direction": "up", "toggle": true }),
    )
    .await;
    assert_eq!(second["user_vote"], Value::Null);
    assert_eq!(second["total_votes"], 0);
}

#[tokio::test]
async fn comment_tally_is_independent_of_post_tally() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let voter = register(&app.app, "voter").await;
    let post = create_post(&app.app, &author, "Best class of dragon?", "question").await;
    let post_id = post["id"].as_str().unwrap();
    let comment = create_comment(&app.app, &author, post_id, "Strike class, easily.", None).await;
    let comment_id = comment["id"].as_str().unwrap();

    vote(
        &app.app,
        &voter,
        &format!("/api/v1/comments/{}/vote", comment_id),
        json!({ "direction": "down" }),
    )
    .await;

    let res = send(
        &app.app,
        empty_request("GET", &format!("/api/v1/posts/{}/vote", post_id), None),
    )
    .await;
    let post_state: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(post_state["total_votes"], 0);

    let res = send(
        &app.app,
        empty_request("GET", &format!("/api/v1/comments/{}/vote", comment_id), None),
    )
    .await;
    let comment_state: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(comment_state["total_votes"], -1);
    assert_eq!(comment_state["target"]["kind"], "comment");
}

#[tokio::test]
async fn anonymous_votes_are_rejected() {
    let app = spawn_app().await;
    let author = register(&app.app, "author").await;
    let post = create_post(&app.app, &author, "Dragon racing rules", "discussion").await;

    let req = json_request(
        "POST",
        &format!("/api/v1/posts/{}/vote", post["id"].as_str().unwrap()),
        None,
        json!({ "direction": "up" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::UNAUTHORIZED).await;
}

#[tokio::test]
async fn voting_on_a_missing_target_is_not_found() {
    let app = spawn_app().await;
    let voter = register(&app.app, "voter").await;

    let req = json_request(
        "POST",
        &format!("/api/v1/comments/{}/vote", uuid::Uuid::now_v7()),
        Some(&voter.token),
        json!({ "direction": "up" }),
    );
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}
