use axum::{
    Json,
    extract::{Path, Query, State},
    http::HeaderMap,
};
use uuid::Uuid;

use crate::{
    application::encyclopedia::dto::{
        FavoriteResponse, IndividualQuery, SearchQuery, SearchResults, SpeciesQuery,
        ToggleFavoriteRequest,
    },
    domain::dragon::entity::{DragonClass, DragonLocation, IndividualDetail, SpeciesDetail},
    presentation::http::{errors::AppError, middleware::user::viewer_id, state::AppState},
};

pub async fn list_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<DragonClass>>, AppError> {
    Ok(Json(state.encyclopedia.classes().await?))
}

pub async fn list_species(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SpeciesQuery>,
) -> Result<Json<Vec<SpeciesDetail>>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.encyclopedia.species(viewer, query).await?))
}

pub async fn get_species(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<SpeciesDetail>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.encyclopedia.species_by_id(viewer, id).await?))
}

pub async fn list_individuals(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<IndividualQuery>,
) -> Result<Json<Vec<IndividualDetail>>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.encyclopedia.individuals(viewer, query).await?))
}

pub async fn get_individual(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<IndividualDetail>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.encyclopedia.individual_by_id(viewer, id).await?))
}

pub async fn list_locations(
    State(state): State<AppState>,
) -> Result<Json<Vec<DragonLocation>>, AppError> {
    Ok(Json(state.encyclopedia.locations().await?))
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DragonLocation>, AppError> {
    Ok(Json(state.encyclopedia.location_by_id(id).await?))
}

pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResults>, AppError> {
    let viewer = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.encyclopedia.search(viewer, &query.q).await?))
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ToggleFavoriteRequest>,
) -> Result<Json<FavoriteResponse>, AppError> {
    let caller = viewer_id(&headers, &state.config.jwt_secret);
    Ok(Json(state.encyclopedia.toggle_favorite(caller, body).await?))
}
