//! Database error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl DbError {
    /// Map a SQLite unique-constraint violation onto `Duplicate`.
    ///
    /// SQLite reports the offending column as `table.column`; the column
    /// name is kept so callers can tell the client which field collided.
    pub(crate) fn from_unique_violation(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_unique_violation()
        {
            let field = db_err
                .message()
                .rsplit('.')
                .next()
                .unwrap_or("field")
                .trim()
                .to_string();
            return DbError::Duplicate(field);
        }
        DbError::Connection(err)
    }
}
