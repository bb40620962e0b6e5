//! Access control gate consulted before any board operation.

use crate::project::domain::{CallerIdentity, ProjectId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Decides whether a caller may reach a project.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessGate: Send + Sync {
    /// Returns `true` when the caller may read and modify the project.
    ///
    /// # Errors
    ///
    /// Returns [`AccessGateError`] when the decision cannot be made.
    async fn has_project_access(
        &self,
        project_id: ProjectId,
        caller: &CallerIdentity,
    ) -> Result<bool, AccessGateError>;
}

/// Failure to evaluate an access decision.
#[derive(Debug, Clone, Error)]
#[error("access check failed: {0}")]
pub struct AccessGateError(Arc<dyn std::error::Error + Send + Sync>);

impl AccessGateError {
    /// Wraps the underlying failure.
    pub fn new(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(err))
    }
}
