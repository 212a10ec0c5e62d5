use super::{
    handlers::{auth, comments, dragons, health, posts, profiles, votes},
    middleware::rate_limit::rate_limit_middleware,
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login_user))
        .route("/auth/me", get(auth::me))
        // Posts
        .route("/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/posts/{id}",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/posts/{id}/vote",
            get(votes::post_vote_state).post(votes::vote_post),
        )
        .route(
            "/posts/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        // Comments
        .route(
            "/comments/{id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
        .route(
            "/comments/{id}/vote",
            get(votes::comment_vote_state).post(votes::vote_comment),
        )
        // Profiles
        .route("/profiles/{username}", get(profiles::get_profile))
        .route(
            "/profiles/{username}/follow",
            post(profiles::toggle_follow),
        )
        .route(
            "/me/profile",
            get(profiles::get_my_profile).patch(profiles::update_my_profile),
        )
        .route("/me/favorites", get(profiles::my_favorites))
        // Encyclopedia
        .route("/dragons/classes", get(dragons::list_classes))
        .route("/dragons/species", get(dragons::list_species))
        .route("/dragons/species/{id}", get(dragons::get_species))
        .route("/dragons/individuals", get(dragons::list_individuals))
        .route("/dragons/individuals/{id}", get(dragons::get_individual))
        .route("/dragons/locations", get(dragons::list_locations))
        .route("/dragons/locations/{id}", get(dragons::get_location))
        .route("/dragons/search", get(dragons::search))
        .route("/dragons/favorites", post(dragons::toggle_favorite))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
