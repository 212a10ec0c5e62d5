use super::helpers::{
    empty_request, expect_status, json_request, read_json, register, send, spawn_app,
};
use axum::http::StatusCode;
use serde_json::{Value, json};
use wyrmlore_api::infrastructure::memory::seed::{
    BERK_ID, GRONCKLE_ID, HIDDEN_WORLD_ID, MEATLUG_ID, NIGHT_FURY_ID, STRIKE_CLASS_ID,
    TOOTHLESS_ID,
};

async fn get_json(app: &axum::Router, uri: &str, token: Option<&str>) -> Value {
    let res = send(app, empty_request("GET", uri, token)).await;
    read_json(expect_status(res, StatusCode::OK).await).await
}

fn ids(items: &Value) -> Vec<String> {
    items
        .as_array()
        .expect("expected an array")
        .iter()
        .map(|item| item["id"].as_str().expect("missing id").to_string())
        .collect()
}

#[tokio::test]
async fn species_come_with_class_abilities_and_stats() {
    let app = spawn_app().await;

    let species = get_json(&app.app, "/api/v1/dragons/species", None).await;
    assert_eq!(ids(&species).len(), 2);

    let fury = get_json(
        &app.app,
        &format!("/api/v1/dragons/species/{}", NIGHT_FURY_ID),
        None,
    )
    .await;
    assert_eq!(fury["name"], "Night Fury");
    assert_eq!(fury["dragon_class"]["id"], STRIKE_CLASS_ID.to_string());
    assert!(!fury["abilities"].as_array().unwrap().is_empty());
    assert!(fury["stats"].is_object());
    assert_eq!(fury["is_favorited"], false);

    let gronckle = get_json(
        &app.app,
        &format!("/api/v1/dragons/species/{}", GRONCKLE_ID),
        None,
    )
    .await;
    assert!(gronckle["stats"].is_null());
}

#[tokio::test]
async fn species_filters_by_class_and_rarity() {
    let app = spawn_app().await;

    let strike = get_json(
        &app.app,
        &format!("/api/v1/dragons/species?class_id={}", STRIKE_CLASS_ID),
        None,
    )
    .await;
    assert_eq!(ids(&strike), vec![NIGHT_FURY_ID.to_string()]);

    let common = get_json(&app.app, "/api/v1/dragons/species?rarity=common", None).await;
    assert_eq!(ids(&common), vec![GRONCKLE_ID.to_string()]);
}

#[tokio::test]
async fn individuals_filter_by_featured_and_load_relationships() {
    let app = spawn_app().await;

    let featured = get_json(&app.app, "/api/v1/dragons/individuals?featured=true", None).await;
    assert_eq!(ids(&featured), vec![TOOTHLESS_ID.to_string()]);
    assert_eq!(featured[0]["species"]["name"], "Night Fury");

    let toothless = get_json(
        &app.app,
        &format!("/api/v1/dragons/individuals/{}", TOOTHLESS_ID),
        None,
    )
    .await;
    let relationships = toothless["relationships"].as_array().unwrap();
    assert_eq!(relationships.len(), 1);
    assert_eq!(relationships[0]["relationship_type"], "pack_member");
    assert_eq!(relationships[0]["related_dragon"]["id"], MEATLUG_ID.to_string());
}

#[tokio::test]
async fn hidden_locations_are_left_out_of_the_list() {
    let app = spawn_app().await;

    let locations = get_json(&app.app, "/api/v1/dragons/locations", None).await;
    assert_eq!(ids(&locations), vec![BERK_ID.to_string()]);

    let hidden = get_json(
        &app.app,
        &format!("/api/v1/dragons/locations/{}", HIDDEN_WORLD_ID),
        None,
    )
    .await;
    assert_eq!(hidden["is_hidden"], true);

    let req = empty_request(
        "GET",
        &format!("/api/v1/dragons/locations/{}", uuid::Uuid::now_v7()),
        None,
    );
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;
}

#[tokio::test]
async fn search_matches_names_and_descriptions() {
    let app = spawn_app().await;

    let results = get_json(&app.app, "/api/v1/dragons/search?q=night%20fury", None).await;
    assert_eq!(ids(&results["species"]), vec![NIGHT_FURY_ID.to_string()]);
    // Toothless only mentions Night Fury in the description.
    assert_eq!(ids(&results["individuals"]), vec![TOOTHLESS_ID.to_string()]);

    let req = empty_request("GET", "/api/v1/dragons/search?q=%20", None);
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;
}

#[tokio::test]
async fn favorites_toggle_and_decorate_reads() {
    let app = spawn_app().await;
    let user = register(&app.app, "collector").await;

    let req = json_request(
        "POST",
        "/api/v1/dragons/favorites",
        Some(&user.token),
        json!({ "species_id": NIGHT_FURY_ID }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let toggled: Value = read_json(res).await;
    assert_eq!(toggled["favorited"], true);

    let fury = get_json(
        &app.app,
        &format!("/api/v1/dragons/species/{}", NIGHT_FURY_ID),
        Some(&user.token),
    )
    .await;
    assert_eq!(fury["is_favorited"], true);

    let favorites = get_json(&app.app, "/api/v1/me/favorites", Some(&user.token)).await;
    assert_eq!(ids(&favorites["species"]), vec![NIGHT_FURY_ID.to_string()]);
    assert!(favorites["individuals"].as_array().unwrap().is_empty());

    let req = json_request(
        "POST",
        "/api/v1/dragons/favorites",
        Some(&user.token),
        json!({ "species_id": NIGHT_FURY_ID }),
    );
    let res = expect_status(send(&app.app, req).await, StatusCode::OK).await;
    let untoggled: Value = read_json(res).await;
    assert_eq!(untoggled["favorited"], false);
}

#[tokio::test]
async fn favorites_need_exactly_one_existing_target() {
    let app = spawn_app().await;
    let user = register(&app.app, "picky").await;

    let req = json_request(
        "POST",
        "/api/v1/dragons/favorites",
        Some(&user.token),
        json!({ "species_id": NIGHT_FURY_ID, "individual_id": TOOTHLESS_ID }),
    );
    expect_status(send(&app.app, req).await, StatusCode::BAD_REQUEST).await;

    let req = json_request(
        "POST",
        "/api/v1/dragons/favorites",
        Some(&user.token),
        json!({ "individual_id": uuid::Uuid::now_v7() }),
    );
    expect_status(send(&app.app, req).await, StatusCode::NOT_FOUND).await;

    let req = json_request(
        "POST",
        "/api/v1/dragons/favorites",
        None,
        json!({ "species_id": NIGHT_FURY_ID }),
    );
    expect_status(send(&app.app, req).await, StatusCode::UNAUTHORIZED).await;
}
