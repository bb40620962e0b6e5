//! `PostgreSQL` adapter for the user directory.

pub(crate) mod models;
mod repository;

pub(crate) use repository::row_to_user;
pub use repository::PostgresUserRepository;
