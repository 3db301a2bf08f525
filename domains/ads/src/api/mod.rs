//! API layer for the advertisements domain
//!
//! Contains HTTP handlers, routes, and the request-session middleware.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::AdsState;
pub use routes::routes;
