//! Shared utilities, configuration, and error handling for Adboard
//!
//! This crate provides common functionality used across the Adboard application:
//! - Configuration management following 12-factor principles
//! - Error types and their HTTP translation
//! - The storage gateway (connection pool + request-scoped sessions)
//! - Custom axum extractors

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use db::{RepositoryError, Session, Storage};
pub use error::{Error, Result};
pub use extractors::AppJson;
