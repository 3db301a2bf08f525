//! Advertisements domain: entities, repository, HTTP API

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Advertisement, AdvertisementPatch, NewAdvertisement};

// Re-export API types
pub use api::routes;
pub use api::AdsState;
