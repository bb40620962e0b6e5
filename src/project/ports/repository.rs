//! Repository port for project persistence and membership.

use crate::project::domain::{NewProject, Project, ProjectId, ProjectKey, UserId};
use crate::user::domain::User;
use crate::workflow::domain::WorkflowTemplate;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project persistence contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project together with its initial workflow statuses.
    ///
    /// The project row and every status of `workflow` are written in one
    /// transaction; statuses receive sort orders `0..n` in template order.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::DuplicateKey`] when another project
    /// already uses the key.
    async fn create(
        &self,
        project: &NewProject,
        workflow: &WorkflowTemplate,
    ) -> ProjectRepositoryResult<Project>;

    /// Persists name and description changes.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()>;

    /// Deletes a project and everything it owns.
    ///
    /// Returns `false` when the project does not exist.
    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool>;

    /// Finds a project by identifier.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Finds a project by its unique key.
    async fn find_by_key(&self, key: &ProjectKey) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns all projects ordered by name.
    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>>;

    /// Returns the projects the user is a member of, ordered by name.
    async fn list_for_member(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>>;

    /// Adds a user to a project.
    ///
    /// Returns `false` when the user is already a member.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist and [`ProjectRepositoryError::UserNotFound`] when the user is
    /// not in the directory.
    async fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool>;

    /// Removes a user from a project.
    ///
    /// Returns `false` when the user was not a member.
    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool>;

    /// Returns the members of a project ordered by display name, then
    /// identifier.
    async fn list_members(&self, project_id: ProjectId) -> ProjectRepositoryResult<Vec<User>>;

    /// Returns `true` when the user is a member of the project.
    async fn is_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// A project with the same key already exists.
    #[error("duplicate project key: {0}")]
    DuplicateKey(ProjectKey),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The user is not in the directory.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<crate::persistence::MemoryLockError> for ProjectRepositoryError {
    fn from(err: crate::persistence::MemoryLockError) -> Self {
        Self::persistence(err)
    }
}

impl From<crate::persistence::PoolAccessError> for ProjectRepositoryError {
    fn from(err: crate::persistence::PoolAccessError) -> Self {
        Self::persistence(err)
    }
}

impl From<diesel::result::Error> for ProjectRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
