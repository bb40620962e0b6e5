//! In-memory workflow repository for tests and embedding.

mod repository;

pub use repository::InMemoryWorkflowRepository;
