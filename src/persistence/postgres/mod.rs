//! `PostgreSQL` plumbing shared by the Diesel adapters.
//!
//! Diesel connections are synchronous, so every repository hands its work to
//! [`with_connection`], which checks a connection out of the r2d2 pool on a
//! blocking thread.

pub mod schema;

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::num::NonZeroU32;
use thiserror::Error;

const TRACKER_SCHEMA: &str =
    include_str!("../../../migrations/2026-02-03-000000_create_tracker_tables/up.sql");

/// Connection pool type used by every `PostgreSQL` adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Failures reaching a pooled connection.
#[derive(Debug, Error)]
pub enum PoolAccessError {
    /// The pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Build(#[source] PoolError),

    /// No connection could be checked out.
    #[error("failed to check out a database connection: {0}")]
    Checkout(#[source] PoolError),

    /// The blocking task running the query panicked or was cancelled.
    #[error("blocking database task failed: {0}")]
    Join(#[source] tokio::task::JoinError),
}

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolAccessError::Build`] when the pool cannot establish its
/// initial connections.
pub fn build_pool(database_url: &str, max_size: NonZeroU32) -> Result<PgPool, PoolAccessError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(max_size.get())
        .build(manager)
        .map_err(PoolAccessError::Build)
}

/// Failures applying the bundled tracker schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No connection was available.
    #[error(transparent)]
    Pool(#[from] PoolAccessError),

    /// A DDL statement failed.
    #[error("failed to apply tracker schema: {0}")]
    Statement(#[from] DieselError),
}

/// Applies the tracker schema. Every statement is idempotent, so this is
/// safe to run against an already migrated database.
///
/// # Errors
///
/// Returns [`SchemaError`] when no connection is available or a statement
/// fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), SchemaError> {
    with_connection(pool, |connection| {
        connection.batch_execute(TRACKER_SCHEMA)?;
        Ok(())
    })
    .await
}

/// Runs `f` with a pooled connection on the blocking thread pool.
pub(crate) async fn with_connection<F, T, E>(pool: &PgPool, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<PoolAccessError> + Send + 'static,
{
    let shared = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = shared.get().map_err(PoolAccessError::Checkout)?;
        f(&mut connection)
    })
    .await
    .map_err(PoolAccessError::Join)?
}

/// Returns the constraint a unique violation tripped, if `err` is one.
pub(crate) fn unique_violation(err: &DieselError) -> Option<&str> {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name()
        }
        _ => None,
    }
}

/// Returns the constraint a foreign key violation tripped, if `err` is one.
pub(crate) fn foreign_key_violation(err: &DieselError) -> Option<&str> {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            info.constraint_name()
        }
        _ => None,
    }
}
