//! `PostgreSQL` adapter for workflow persistence.

pub(crate) mod models;
mod repository;

pub use repository::PostgresWorkflowRepository;
