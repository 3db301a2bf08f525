//! Advertisements domain state and request-session middleware

use adboard_common::{Error, Storage};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Application state for the advertisements domain
#[derive(Clone)]
pub struct AdsState {
    pub storage: Storage,
}

/// Opens one unit-of-work per request and guarantees its disposal.
///
/// The session is attached to the request extensions for the handler and
/// repository to use. Committing is the repository's job; whatever is left
/// open when the handler returns (a read, or a failed write path) is
/// rolled back here so the connection always returns to the pool and no
/// session outlives its request.
pub async fn db_session(
    State(state): State<AdsState>,
    mut request: Request,
    next: Next,
) -> Response {
    let session = match state.storage.begin().await {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "failed to open a database session");
            return Error::Database(err).into_response();
        }
    };

    request.extensions_mut().insert(session.clone());
    let response = next.run(request).await;
    session.close().await;

    response
}
