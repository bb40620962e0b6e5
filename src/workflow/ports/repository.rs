//! Transactional repository port for workflow statuses and column preferences.

use crate::project::domain::{ProjectId, UserId};
use crate::workflow::domain::{
    ColumnPreference, NewColumnPreference, NewProjectStatus, ProjectStatus, SortOrder,
    StatusId, StatusName,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow repository operations.
pub type WorkflowRepositoryResult<T> = Result<T, WorkflowRepositoryError>;

/// Operations available inside one workflow transaction.
///
/// Implementations are synchronous: they run on whatever thread the owning
/// [`WorkflowRepository`] chose for the transaction.
pub trait WorkflowTransaction {
    /// Returns `true` when the project exists.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the lookup fails.
    fn project_exists(&mut self, project_id: ProjectId) -> WorkflowRepositoryResult<bool>;

    /// Returns the project's statuses ordered by sort order, then id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the statuses cannot be read.
    fn list_statuses(&mut self, project_id: ProjectId)
    -> WorkflowRepositoryResult<Vec<ProjectStatus>>;

    /// Finds a status owned by the project.
    ///
    /// Returns `None` when the status does not exist or belongs to another
    /// project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the lookup fails.
    fn find_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<Option<ProjectStatus>>;

    /// Finds a status owned by the project and locks it until the
    /// transaction ends.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the lookup fails.
    fn lock_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<Option<ProjectStatus>>;

    /// Returns `true` when another status of the project has the same name
    /// ignoring case. `excluding` names a status to leave out of the check.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the lookup fails.
    fn status_name_exists(
        &mut self,
        project_id: ProjectId,
        name: &StatusName,
        excluding: Option<StatusId>,
    ) -> WorkflowRepositoryResult<bool>;

    /// Returns the highest sort order in the project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the lookup fails.
    fn max_sort_order(&mut self, project_id: ProjectId)
    -> WorkflowRepositoryResult<Option<SortOrder>>;

    /// Inserts a status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateStatusName`] when the name
    /// collides with an existing status of the project.
    fn insert_status(&mut self, status: &NewProjectStatus)
    -> WorkflowRepositoryResult<ProjectStatus>;

    /// Persists a status name change.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::StatusNotFound`] when the status is
    /// gone or [`WorkflowRepositoryError::DuplicateStatusName`] when the new
    /// name collides.
    fn rename_status(&mut self, status: &ProjectStatus) -> WorkflowRepositoryResult<()>;

    /// Deletes a status together with its column preferences.
    ///
    /// Returns `false` when the status does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::StatusInUse`] when a ticket still
    /// references the status.
    fn delete_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<bool>;

    /// Returns `true` when any ticket references the status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the lookup fails.
    fn status_in_use(&mut self, status_id: StatusId) -> WorkflowRepositoryResult<bool>;

    /// Returns a user's column preferences for a project in storage order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the rows cannot be read.
    fn list_column_preferences(
        &mut self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>>;

    /// Inserts column preferences and returns them with their identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateColumnPreference`] when a
    /// row already exists for the same project, user and status.
    fn insert_column_preferences(
        &mut self,
        rows: &[NewColumnPreference],
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>>;

    /// Inserts the column preferences that do not exist yet and returns the
    /// rows this call stored.
    ///
    /// Rows already present for the same project, user and status, including
    /// rows committed by a concurrent transaction, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError`] when the rows cannot be written.
    fn insert_missing_column_preferences(
        &mut self,
        rows: &[NewColumnPreference],
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>>;

    /// Overwrites the position and visibility of a stored preference.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::ColumnPreferenceNotFound`] when the
    /// row is gone.
    fn update_column_preference(&mut self, row: &ColumnPreference)
    -> WorkflowRepositoryResult<()>;
}

/// Entry point for workflow persistence.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Runs `work` inside one transaction.
    ///
    /// Changes are committed when `work` returns `Ok` and discarded when it
    /// returns `Err`. Failures of the transaction machinery itself reach the
    /// caller through `E: From<WorkflowRepositoryError>`.
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WorkflowTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<WorkflowRepositoryError> + Send + 'static;
}

/// Errors returned by workflow repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowRepositoryError {
    /// The project already has a status with this name, ignoring case.
    #[error("project {project_id} already has a status named '{name}'")]
    DuplicateStatusName {
        /// Project owning the statuses.
        project_id: ProjectId,
        /// Rejected name.
        name: StatusName,
    },

    /// The status does not exist.
    #[error("status not found: {0}")]
    StatusNotFound(StatusId),

    /// A ticket references the status.
    #[error("status {0} is referenced by tickets")]
    StatusInUse(StatusId),

    /// A preference row already exists for the status.
    #[error("column preference for status {0} already exists")]
    DuplicateColumnPreference(StatusId),

    /// The preference row does not exist.
    #[error("column preference not found for status {0}")]
    ColumnPreferenceNotFound(StatusId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<crate::persistence::MemoryLockError> for WorkflowRepositoryError {
    fn from(err: crate::persistence::MemoryLockError) -> Self {
        Self::persistence(err)
    }
}

impl From<crate::persistence::PoolAccessError> for WorkflowRepositoryError {
    fn from(err: crate::persistence::PoolAccessError) -> Self {
        Self::persistence(err)
    }
}
