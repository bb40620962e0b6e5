//! Storage shared by every bounded context.
//!
//! Projects, statuses, column preferences and tickets reference each other
//! through foreign keys, so their adapters share one backing store: the
//! [`memory::InMemoryDatabase`] for tests and embedding, and one `PostgreSQL`
//! connection pool plus Diesel schema in [`postgres`].

pub mod memory;
pub mod postgres;

pub use memory::{InMemoryDatabase, MemoryLockError};
pub use postgres::{PgPool, PoolAccessError, SchemaError, apply_schema, build_pool};
