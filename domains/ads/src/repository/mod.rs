//! Repository implementations for the advertisements domain

pub mod ads;
