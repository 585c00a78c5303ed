//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] estatehub_db::DbError),

    #[error("Auth error: {0}")]
    Auth(#[from] estatehub_auth::AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),
}

impl CoreError {
    /// Translate store-level duplicates into a client-facing message
    pub(crate) fn from_db(err: estatehub_db::DbError, resource: &str) -> Self {
        match err {
            estatehub_db::DbError::Duplicate(field) => {
                CoreError::Duplicate(format!("{resource} with that {field} already exists."))
            }
            other => CoreError::Database(other),
        }
    }
}
