//! Advertisements domain layer: entities

pub mod entities;
