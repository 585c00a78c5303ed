//! Listing routes

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use estatehub_db::Listing;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::extract::{Authenticated, JsonBody};
use crate::state::AppState;

use super::types::{ListingRequest, MessageResponse};

/// POST /listing/create
async fn create_listing(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    JsonBody(request): JsonBody<ListingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let listing = state.listings.create(&identity, request.into()).await?;
    metrics::counter!("estatehub_listing_mutations_total", "action" => "create").increment(1);
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /listing/get/{id}
async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Listing>, ApiError> {
    Ok(Json(state.listings.get(&id).await?))
}

/// POST /listing/update/{id}
async fn update_listing(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<ListingRequest>,
) -> Result<Json<Listing>, ApiError> {
    let listing = state.listings.update(&identity, &id, request.into()).await?;
    metrics::counter!("estatehub_listing_mutations_total", "action" => "update").increment(1);
    Ok(Json(listing))
}

/// DELETE /listing/delete/{id}
async fn delete_listing(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.listings.delete(&identity, &id).await?;
    metrics::counter!("estatehub_listing_mutations_total", "action" => "delete").increment(1);
    Ok(Json(MessageResponse::ok("Listing has been deleted!")))
}

/// GET /listing/get?searchTerm&type&offer&furnished&parking&sort&order&limit&startIndex
async fn search_listings(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    let Query(params) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    metrics::counter!("estatehub_listing_searches_total").increment(1);
    Ok(Json(state.listings.search(&params).await?))
}

/// Listing routes open to anonymous callers
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/listing/get", get(search_listings))
        .route("/listing/get/{id}", get(get_listing))
}

/// Listing routes requiring a session
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/listing/create", post(create_listing))
        .route("/listing/update/{id}", post(update_listing))
        .route("/listing/delete/{id}", delete(delete_listing))
}
