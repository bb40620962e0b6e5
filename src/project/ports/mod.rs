//! Port contracts for the project registry.
//!
//! Ports define infrastructure-agnostic interfaces used by project services
//! and by the board facade.

pub mod access;
pub mod repository;

pub use access::{AccessGate, AccessGateError};
pub use repository::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};

#[cfg(test)]
pub use access::MockAccessGate;
