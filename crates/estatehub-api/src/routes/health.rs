//! Health check endpoints

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::state::AppState;

/// Health status response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check handler
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    metrics::counter!("estatehub_health_checks_total").increment(1);

    let status = match state.db.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            warn!("Health check could not reach the database: {}", e);
            "degraded"
        }
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
}
