//! Service-level errors shared by the workflow services.

use crate::error::ErrorKind;
use crate::project::domain::ProjectId;
use crate::workflow::{
    domain::{StatusId, WorkflowDomainError},
    ports::WorkflowRepositoryError,
};
use thiserror::Error;

/// Errors returned by workflow services.
#[derive(Debug, Error)]
pub enum WorkflowServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),

    /// The project already has a status with this name, ignoring case.
    #[error("project {project_id} already has a status named '{name}'")]
    DuplicateStatusName {
        /// Project owning the statuses.
        project_id: ProjectId,
        /// Rejected name.
        name: String,
    },

    /// The status is referenced by tickets.
    #[error("status {0} is in use by tickets")]
    StatusInUse(StatusId),

    /// The status does not exist in the project.
    #[error("status {status_id} not found in project {project_id}")]
    StatusNotFound {
        /// Project that was searched.
        project_id: ProjectId,
        /// Missing status.
        status_id: StatusId,
    },

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The project has no statuses to pick a default from.
    #[error("project {0} has no workflow statuses")]
    NoStatuses(ProjectId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(WorkflowRepositoryError),
}

impl From<WorkflowRepositoryError> for WorkflowServiceError {
    fn from(err: WorkflowRepositoryError) -> Self {
        match err {
            WorkflowRepositoryError::DuplicateStatusName { project_id, name } => {
                Self::DuplicateStatusName {
                    project_id,
                    name: name.as_str().to_owned(),
                }
            }
            WorkflowRepositoryError::StatusInUse(status_id) => Self::StatusInUse(status_id),
            other => Self::Repository(other),
        }
    }
}

impl WorkflowServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(WorkflowDomainError::InvalidSortOrder(_)) => ErrorKind::Persistence,
            Self::Domain(WorkflowDomainError::SortOrderOverflow)
            | Self::DuplicateStatusName { .. }
            | Self::StatusInUse(_)
            | Self::Repository(WorkflowRepositoryError::DuplicateColumnPreference(_)) => {
                ErrorKind::Conflict
            }
            Self::Domain(_) => ErrorKind::Validation,
            Self::StatusNotFound { .. }
            | Self::ProjectNotFound(_)
            | Self::Repository(
                WorkflowRepositoryError::StatusNotFound(_)
                | WorkflowRepositoryError::ColumnPreferenceNotFound(_),
            ) => ErrorKind::NotFound,
            Self::NoStatuses(_) => ErrorKind::Configuration,
            Self::Repository(_) => ErrorKind::Persistence,
        }
    }
}

/// Result type for workflow service operations.
pub type WorkflowServiceResult<T> = Result<T, WorkflowServiceError>;
