//! Domain entities for the Adboard advertisements domain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Advertisement entity
///
/// `id` and `created_at` are assigned by the store at insertion and are
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Advertisement {
    pub id: i64,
    pub header: String,
    pub description: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when creating an advertisement.
///
/// All three are required; empty strings are valid. Unknown keys are
/// rejected at deserialization, so a payload naming `id` or `created_at`
/// never reaches the repository.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAdvertisement {
    pub header: String,
    pub description: String,
    pub owner: String,
}

/// Partial update: only the fields present change.
///
/// Same unknown-key policy as [`NewAdvertisement`], which is what forbids
/// overriding `id` or `created_at`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdvertisementPatch {
    pub header: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
}
