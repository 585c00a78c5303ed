//! EstateHub Database Layer
//!
//! This crate provides the persistence layer for EstateHub: users,
//! listings and reviews stored in SQLite via sqlx, plus the listing
//! search query engine.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::{Database, ListingQuery, SortDirection, SortField};
