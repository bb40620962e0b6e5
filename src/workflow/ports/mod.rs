//! Port contracts for the status registry and column preference store.
//!
//! Every workflow operation is a short read-then-write sequence that must be
//! atomic, so the port exposes a single transactional entry point instead of
//! individual async calls.

pub mod repository;

pub use repository::{
    WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult, WorkflowTransaction,
};
