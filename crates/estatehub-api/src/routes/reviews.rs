//! Review routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use estatehub_db::Review;

use crate::error::ApiError;
use crate::extract::{Authenticated, JsonBody};
use crate::state::AppState;

use super::types::ReviewRequest;

/// POST /review/create
async fn create_review(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    JsonBody(request): JsonBody<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.reviews.create(&identity, request.into()).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /review/get/{listing_id}
async fn list_reviews(
    State(state): State<AppState>,
    Path(listing_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.reviews.list_for_listing(&listing_id).await?))
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/review/get/{listing_id}", get(list_reviews))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/review/create", post(create_review))
}
