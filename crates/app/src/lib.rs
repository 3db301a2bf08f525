//! Adboard application composition root
//!
//! Composes the domain routers into a single application.

use adboard_ads::AdsState;
use adboard_common::Storage;
use axum::Router;

/// Create the main application router with all routes and middleware
pub fn create_app(storage: Storage) -> Router {
    let ads_state = AdsState { storage };

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(adboard_ads::routes(ads_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
