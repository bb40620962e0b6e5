//! In-memory project repository for tests and embedding.

mod repository;

pub use repository::InMemoryProjectRepository;
