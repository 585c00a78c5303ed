//! API error types
//!
//! `ApiError` is the single place where failures become HTTP responses.
//! Every handler and the session middleware return it.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use estatehub_auth::{AuthError, TokenError};
use estatehub_core::CoreError;
use estatehub_db::DbError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Auth(AuthError::Token(err))
    }
}

const INTERNAL_MESSAGE: &str = "Internal Server Error";

fn auth_status(err: &AuthError) -> (StatusCode, String) {
    match err {
        AuthError::MissingCredential => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized - No token provided".to_string(),
        ),
        AuthError::Token(TokenError::Expired) => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized - Token expired".to_string(),
        ),
        AuthError::Token(TokenError::Malformed) => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized - Invalid token".to_string(),
        ),
        AuthError::Token(TokenError::SignatureInvalid) => (
            StatusCode::UNAUTHORIZED,
            "Unauthorized - Invalid token signature".to_string(),
        ),
        AuthError::Token(TokenError::Unverifiable(_)) => (
            StatusCode::FORBIDDEN,
            "Forbidden - Token verification failed".to_string(),
        ),
        AuthError::InvalidCredentials => {
            (StatusCode::UNAUTHORIZED, "Wrong credentials!".to_string())
        }
        AuthError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
        AuthError::PasswordHash(_) | AuthError::Signing(_) | AuthError::TokenLifetime => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
        }
    }
}

fn db_status(err: &DbError) -> (StatusCode, String) {
    match err {
        DbError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        DbError::Duplicate(field) => (
            StatusCode::CONFLICT,
            format!("Record with that {field} already exists."),
        ),
        DbError::Connection(_) | DbError::Encoding(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
        }
    }
}

impl ApiError {
    /// Status code and client-facing message
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            ApiError::Core(e) => match e {
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Duplicate(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
                CoreError::Auth(e) => auth_status(e),
                CoreError::Database(e) => db_status(e),
            },
            ApiError::Database(e) => db_status(e),
            ApiError::Auth(e) => auth_status(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        let body = axum::Json(json!({
            "success": false,
            "statusCode": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
