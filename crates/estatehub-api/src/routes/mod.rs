//! API routes

mod auth;
mod health;
mod listings;
pub mod metrics;
mod reviews;
pub mod types;
mod users;

use axum::{Router, extract::DefaultBodyLimit, middleware::from_fn_with_state};
use std::sync::Arc;

use crate::middleware::require_session;
use crate::state::{AppState, MetricsHandle};

/// Request bodies are small JSON documents
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main router
///
/// Routes are split into a public router and a protected one; only the
/// latter runs behind `require_session`.
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let public = Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(listings::public_routes())
        .merge(reviews::public_routes());

    let protected = Router::new()
        .merge(listings::protected_routes())
        .merge(users::routes())
        .merge(reviews::protected_routes())
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let mut router = public
        .merge(protected)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}
