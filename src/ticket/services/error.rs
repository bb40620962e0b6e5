//! Service-level errors for ticket operations.

use crate::error::ErrorKind;
use crate::project::domain::ProjectId;
use crate::ticket::{
    domain::{TicketDomainError, TicketId},
    ports::TicketRepositoryError,
};
use crate::workflow::{domain::StatusId, services::WorkflowServiceError};
use thiserror::Error;

/// Errors returned by the ticket lifecycle service.
#[derive(Debug, Error)]
pub enum TicketServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TicketDomainError),

    /// The ticket does not exist.
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The status does not belong to the ticket's project.
    #[error("status {status_id} not found in project {project_id}")]
    StatusNotFound {
        /// Project the ticket belongs to.
        project_id: ProjectId,
        /// Rejected status.
        status_id: StatusId,
    },

    /// Every key allocation attempt collided with a concurrent creation.
    #[error("could not allocate a ticket key in project {project_id} after {attempts} attempts")]
    KeyAllocationExhausted {
        /// Project the ticket was created in.
        project_id: ProjectId,
        /// Attempts made.
        attempts: u32,
    },

    /// Resolving the initial status failed.
    #[error(transparent)]
    Workflow(#[from] WorkflowServiceError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(TicketRepositoryError),
}

impl From<TicketRepositoryError> for TicketServiceError {
    fn from(err: TicketRepositoryError) -> Self {
        match err {
            TicketRepositoryError::NotFound(id) => Self::NotFound(id),
            TicketRepositoryError::ProjectNotFound(id) => Self::ProjectNotFound(id),
            TicketRepositoryError::StatusNotFound {
                project_id,
                status_id,
            } => Self::StatusNotFound {
                project_id,
                status_id,
            },
            other => Self::Repository(other),
        }
    }
}

impl TicketServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::ProjectNotFound(_) | Self::StatusNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::KeyAllocationExhausted { .. }
            | Self::Repository(TicketRepositoryError::DuplicateKey(_)) => ErrorKind::Conflict,
            Self::Workflow(err) => err.kind(),
            Self::Repository(_) => ErrorKind::Persistence,
        }
    }
}

/// Result type for ticket service operations.
pub type TicketServiceResult<T> = Result<T, TicketServiceError>;
