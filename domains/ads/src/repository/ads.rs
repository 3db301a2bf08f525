//! Advertisement repository
//!
//! Typed persistence operations, each executed against the caller's
//! request-scoped [`Session`]. Reads leave the session open (the request
//! middleware disposes of it); writes complete the session themselves,
//! committing on success and rolling back on any failure, so a session is
//! committed or rolled back exactly once and partial writes are never
//! visible.

use adboard_common::{RepositoryError, Session};

use crate::domain::entities::{Advertisement, AdvertisementPatch, NewAdvertisement};

const SELECT_BY_ID: &str = "\
    SELECT id, header, description, owner, created_at \
    FROM advs WHERE id = $1";

const INSERT_ONE: &str = "\
    INSERT INTO advs (header, description, owner) \
    VALUES ($1, $2, $3) \
    RETURNING id, header, description, owner, created_at";

// Only the allow-listed columns are touched; absent fields keep their value.
const UPDATE_BY_ID: &str = "\
    UPDATE advs SET \
        header = COALESCE($2, header), \
        description = COALESCE($3, description), \
        owner = COALESCE($4, owner) \
    WHERE id = $1 \
    RETURNING id, header, description, owner, created_at";

const DELETE_BY_ID: &str = "DELETE FROM advs WHERE id = $1";

/// Fetch an advertisement by primary key.
pub async fn get(session: &Session, id: i64) -> Result<Advertisement, RepositoryError> {
    let mut work = session.lock().await;
    let tx = work.tx()?;
    let row = sqlx::query_as::<_, Advertisement>(SELECT_BY_ID)
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;
    row.ok_or(RepositoryError::NotFound)
}

/// Persist a new advertisement; the store assigns `id` and `created_at`.
pub async fn insert(
    session: &Session,
    new_ad: &NewAdvertisement,
) -> Result<Advertisement, RepositoryError> {
    let inserted = {
        let mut work = session.lock().await;
        let tx = work.tx()?;
        sqlx::query_as::<_, Advertisement>(INSERT_ONE)
            .bind(&new_ad.header)
            .bind(&new_ad.description)
            .bind(&new_ad.owner)
            .fetch_one(&mut **tx)
            .await
            .map_err(write_error)
    };
    complete_write(session, inserted).await
}

/// Apply a partial update and return the resulting row.
pub async fn update(
    session: &Session,
    id: i64,
    patch: &AdvertisementPatch,
) -> Result<Advertisement, RepositoryError> {
    let updated = {
        let mut work = session.lock().await;
        let tx = work.tx()?;
        sqlx::query_as::<_, Advertisement>(UPDATE_BY_ID)
            .bind(id)
            .bind(patch.header.as_deref())
            .bind(patch.description.as_deref())
            .bind(patch.owner.as_deref())
            .fetch_optional(&mut **tx)
            .await
            .map_err(write_error)
            .and_then(|row| row.ok_or(RepositoryError::NotFound))
    };
    complete_write(session, updated).await
}

/// Remove an advertisement by primary key.
pub async fn delete(session: &Session, id: i64) -> Result<(), RepositoryError> {
    let deleted = {
        let mut work = session.lock().await;
        let tx = work.tx()?;
        sqlx::query(DELETE_BY_ID)
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(write_error)
            .and_then(|result| {
                if result.rows_affected() == 0 {
                    Err(RepositoryError::NotFound)
                } else {
                    Ok(())
                }
            })
    };
    complete_write(session, deleted).await
}

/// Commit on success, roll back on failure, then propagate the outcome.
async fn complete_write<T>(
    session: &Session,
    result: Result<T, RepositoryError>,
) -> Result<T, RepositoryError> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback_error) = session.rollback().await {
                tracing::warn!(error = %rollback_error, "failed to roll back after write error");
            }
            Err(error)
        }
    }
}

/// Uniqueness violations become `AlreadyExists`. No secondary unique
/// constraint exists today, so outside a primary-key collision this path
/// is never taken.
fn write_error(error: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            return RepositoryError::AlreadyExists;
        }
    }
    RepositoryError::Connection(error)
}
