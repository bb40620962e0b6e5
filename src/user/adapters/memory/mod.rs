//! In-memory user repository for tests and embedding.

mod repository;

pub use repository::InMemoryUserRepository;
