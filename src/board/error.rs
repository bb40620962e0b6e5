//! Errors surfaced by the board facade.

use crate::error::ErrorKind;
use crate::project::{
    domain::{ProjectId, UserId},
    ports::AccessGateError,
};
use crate::workflow::services::WorkflowServiceError;
use thiserror::Error;

/// Errors returned by [`KanbanBoardService`](super::KanbanBoardService).
#[derive(Debug, Error)]
pub enum BoardError {
    /// The caller may not reach the project.
    #[error("user {user_id} may not access project {project_id}")]
    AccessDenied {
        /// Requested project.
        project_id: ProjectId,
        /// Rejected caller.
        user_id: UserId,
    },

    /// The access decision could not be made.
    #[error(transparent)]
    Gate(#[from] AccessGateError),

    /// The workflow operation failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowServiceError),
}

impl BoardError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccessDenied { .. } => ErrorKind::AccessDenied,
            Self::Gate(_) => ErrorKind::Persistence,
            Self::Workflow(err) => err.kind(),
        }
    }
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;
