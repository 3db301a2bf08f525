//! Storage gateway for Adboard
//!
//! Owns the Postgres connection pool and hands out one transactional
//! [`Session`] per request. Repositories run their statements against the
//! session; mutating operations commit it, and the request middleware
//! closes whatever is left so the connection always returns to the pool.

use std::sync::Arc;

use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::Error;
use thiserror::Error;

/// Idempotent schema bootstrap, run once at process start.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS advs (
    id          BIGSERIAL PRIMARY KEY,
    header      TEXT NOT NULL,
    description TEXT NOT NULL,
    owner       TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Database-specific error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Record already exists")]
    AlreadyExists,

    #[error("Session already committed or rolled back")]
    SessionClosed,

    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),
}

impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Error::NotFound("advertisement not found".to_string()),
            RepositoryError::AlreadyExists => {
                Error::Conflict("advertisement already exists".to_string())
            }
            RepositoryError::SessionClosed => {
                Error::Internal("session used after completion".to_string())
            }
            RepositoryError::Connection(e) => Error::Database(e),
        }
    }
}

/// Connection pool plus schema bootstrap and unit-of-work creation.
///
/// Constructed once at startup and passed to whatever needs it; there is no
/// process-global handle.
#[derive(Clone)]
pub struct Storage {
    pool: PgPool,
}

impl Storage {
    /// Connect to the store. A failure here is a startup failure and is not
    /// retried.
    pub async fn connect(database_url: &str) -> std::result::Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Create the advertisement table if it does not exist yet.
    pub async fn ensure_schema(&self) -> std::result::Result<(), sqlx::Error> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Begin a new unit-of-work.
    pub async fn begin(&self) -> std::result::Result<Session, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Session::new(tx))
    }

    /// Close the pool. Called once at process shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// A transactional unit-of-work scoped to one request.
///
/// Cloning the handle shares the same underlying transaction; a request's
/// middleware, handler, and repository calls all see the same session.
/// `commit` and `rollback` consume the transaction, so each session is
/// completed at most once. [`Session::close`] is the disposal path used by
/// the middleware: it rolls back anything still open and is a no-op after
/// commit.
#[derive(Clone)]
pub struct Session {
    tx: Arc<Mutex<Option<Transaction<'static, Postgres>>>>,
}

impl Session {
    fn new(tx: Transaction<'static, Postgres>) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Exclusive access to the live transaction for running statements.
    pub async fn lock(&self) -> SessionGuard {
        SessionGuard {
            guard: self.tx.clone().lock_owned().await,
        }
    }

    /// Commit the unit-of-work. Fails if it was already completed.
    pub async fn commit(&self) -> std::result::Result<(), RepositoryError> {
        let mut guard = self.tx.lock().await;
        match guard.take() {
            Some(tx) => Ok(tx.commit().await?),
            None => Err(RepositoryError::SessionClosed),
        }
    }

    /// Roll the unit-of-work back. Fails if it was already completed.
    pub async fn rollback(&self) -> std::result::Result<(), RepositoryError> {
        let mut guard = self.tx.lock().await;
        match guard.take() {
            Some(tx) => Ok(tx.rollback().await?),
            None => Err(RepositoryError::SessionClosed),
        }
    }

    /// Dispose of the session, rolling back if it is still open.
    ///
    /// Infallible so it can run on every request exit path; a failed
    /// rollback still drops the transaction, which returns the connection
    /// to the pool.
    pub async fn close(&self) {
        let mut guard = self.tx.lock().await;
        if let Some(tx) = guard.take() {
            if let Err(error) = tx.rollback().await {
                tracing::warn!(%error, "failed to roll back request session");
            }
        }
    }
}

/// Lock over a session's transaction, held for the duration of a statement.
pub struct SessionGuard {
    guard: OwnedMutexGuard<Option<Transaction<'static, Postgres>>>,
}

impl SessionGuard {
    /// The live transaction, or `SessionClosed` if the unit-of-work has
    /// already been completed.
    pub fn tx(
        &mut self,
    ) -> std::result::Result<&mut Transaction<'static, Postgres>, RepositoryError> {
        self.guard.as_mut().ok_or(RepositoryError::SessionClosed)
    }
}
