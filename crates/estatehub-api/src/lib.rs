//! EstateHub REST API
//!
//! This crate provides the Axum-based HTTP API for EstateHub: account
//! signup and signin, the listing lifecycle and search, reviews, and the
//! session middleware guarding the protected routes.

pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
