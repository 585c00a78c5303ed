//! Request extractors

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use estatehub_auth::{AuthError, AuthenticatedIdentity};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Identity attached by `require_session`.
///
/// Only usable on routes behind the session middleware; elsewhere it
/// rejects as if no token had been supplied.
pub struct Authenticated(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedIdentity>()
            .cloned()
            .map(Authenticated)
            .ok_or(ApiError::Auth(AuthError::MissingCredential))
    }
}

/// JSON body whose rejections go through `ApiError`
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}
