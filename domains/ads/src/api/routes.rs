//! Route definitions for the advertisements domain API

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use super::handlers::ads;
use super::middleware::{db_session, AdsState};

/// Create the advertisement routes with the per-request session middleware
/// applied. The middleware is scoped here so that unrelated routes (health
/// checks and the like) never open a database session.
pub fn routes(state: AdsState) -> Router {
    Router::new()
        .route("/adv", post(ads::create_advertisement))
        .route(
            "/adv/{id}",
            get(ads::get_advertisement)
                .patch(ads::update_advertisement)
                .delete(ads::delete_advertisement),
        )
        .layer(from_fn_with_state(state.clone(), db_session))
        .with_state(state)
}
