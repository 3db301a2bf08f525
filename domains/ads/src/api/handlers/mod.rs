//! HTTP handlers for the advertisements domain

pub mod ads;
