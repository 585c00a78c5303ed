//! Self-service account routes

use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
};
use estatehub_db::{Listing, User};

use crate::error::ApiError;
use crate::extract::{Authenticated, JsonBody};
use crate::state::AppState;

use super::auth::set_cookie;
use super::types::{MessageResponse, UpdateProfileRequest};

/// POST /user/update/{id}
async fn update_user(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .accounts
        .update_profile(&identity, &id, request.into())
        .await?;
    Ok(Json(user))
}

/// DELETE /user/delete/{id}
async fn delete_user(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.accounts.delete_account(&identity, &id).await?;
    let headers = set_cookie(state.cookies.clear_cookie())?;
    Ok((headers, Json(MessageResponse::ok("User has been deleted!"))))
}

/// GET /user/listings/{id}
async fn user_listings(
    State(state): State<AppState>,
    Authenticated(identity): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<Listing>>, ApiError> {
    Ok(Json(state.accounts.owned_listings(&identity, &id).await?))
}

/// Create user routes (all require a session)
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/user/update/{id}", post(update_user))
        .route("/user/delete/{id}", delete(delete_user))
        .route("/user/listings/{id}", get(user_listings))
}
