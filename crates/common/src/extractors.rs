//! Custom axum extractors for Adboard

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::Error;

/// JSON body extractor whose rejections speak the application's error
/// dialect.
///
/// Replaces `Json<T>` in handlers: every body problem (malformed JSON, a
/// missing required field, an unknown field, a wrong content type) is a
/// 400 with the standard `{"status": "error", ...}` body instead of axum's
/// mixed 400/415/422 defaults.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::Validation(rejection.body_text()))?;
        Ok(AppJson(value))
    }
}
