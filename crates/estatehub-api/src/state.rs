//! Application state

use estatehub_auth::{CookieSettings, JwtManager};
use estatehub_core::{AccountService, ListingService, ReviewService};
use estatehub_db::Database;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Handle used to render the Prometheus exposition
pub type MetricsHandle = PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub accounts: Arc<AccountService>,
    pub listings: Arc<ListingService>,
    pub reviews: Arc<ReviewService>,
    pub jwt: Arc<JwtManager>,
    pub cookies: CookieSettings,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, cookie_secure: bool) -> Self {
        let cookies = CookieSettings {
            secure: cookie_secure,
            max_age_secs: jwt.ttl().num_seconds(),
        };
        Self {
            accounts: Arc::new(AccountService::new(db.clone(), jwt.clone())),
            listings: Arc::new(ListingService::new(db.clone())),
            reviews: Arc::new(ReviewService::new(db.clone())),
            db,
            jwt,
            cookies,
        }
    }
}
