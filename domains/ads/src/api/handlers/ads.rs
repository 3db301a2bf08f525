//! Advertisement CRUD handlers
//!
//! One handler per (method, path) pair on the `/adv` surface. Each request
//! carries its own database session, opened by the middleware and found in
//! the request extensions; handlers pass it to the repository and translate
//! the outcome into the wire format.

use adboard_common::{AppJson, Error, Result, Session};
use axum::{extract::Path, Extension, Json};
use serde::Serialize;

use crate::domain::entities::{Advertisement, AdvertisementPatch, NewAdvertisement};
use crate::repository::ads;

/// Response carrying only the advertisement id (create, update)
#[derive(Debug, Serialize)]
pub struct AdvertisementIdResponse {
    pub id: i64,
}

/// Advertisement representation returned on reads
#[derive(Debug, Serialize)]
pub struct AdvertisementResponse {
    pub header: String,
    pub description: String,
    pub owner: String,
}

impl From<Advertisement> for AdvertisementResponse {
    fn from(ad: Advertisement) -> Self {
        Self {
            header: ad.header,
            description: ad.description,
            owner: ad.owner,
        }
    }
}

/// Acknowledgement for destructive operations
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// Create a new advertisement
///
/// **POST /adv**
pub async fn create_advertisement(
    Extension(session): Extension<Session>,
    AppJson(new_ad): AppJson<NewAdvertisement>,
) -> Result<Json<AdvertisementIdResponse>> {
    let ad = ads::insert(&session, &new_ad).await?;
    Ok(Json(AdvertisementIdResponse { id: ad.id }))
}

/// Get an advertisement
///
/// **GET /adv/{id}**
pub async fn get_advertisement(
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<AdvertisementResponse>> {
    let id = parse_ad_id(&id)?;
    let ad = ads::get(&session, id).await?;
    Ok(Json(AdvertisementResponse::from(ad)))
}

/// Partially update an advertisement
///
/// **PATCH /adv/{id}**
pub async fn update_advertisement(
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<AdvertisementPatch>,
) -> Result<Json<AdvertisementIdResponse>> {
    let id = parse_ad_id(&id)?;
    let ad = ads::update(&session, id, &patch).await?;
    Ok(Json(AdvertisementIdResponse { id: ad.id }))
}

/// Delete an advertisement
///
/// **DELETE /adv/{id}**
pub async fn delete_advertisement(
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Json<StatusResponse>> {
    let id = parse_ad_id(&id)?;
    ads::delete(&session, id).await?;
    Ok(Json(StatusResponse { status: "success" }))
}

/// An advertisement id is one or more decimal digits. Anything else never
/// names a resource, so the route is treated as absent (404) rather than
/// as bad input.
fn parse_ad_id(raw: &str) -> Result<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::NotFound("advertisement not found".to_string()));
    }
    raw.parse::<i64>()
        .map_err(|_| Error::NotFound("advertisement not found".to_string()))
}
