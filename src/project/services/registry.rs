//! Service layer for creating, listing and administering projects.

use crate::error::ErrorKind;
use crate::project::{
    domain::{
        CallerIdentity, NewProject, Project, ProjectDomainError, ProjectId, ProjectKey,
        ProjectName, UserId,
    },
    ports::{ProjectRepository, ProjectRepositoryError},
};
use crate::user::domain::User;
use crate::workflow::domain::WorkflowTemplate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    key: String,
    name: String,
    description: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request with the required key and name.
    #[must_use]
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Sets the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Request payload for changing a project. Unset fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: Option<String>,
}

impl UpdateProjectRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the project name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the project description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// Another project already uses the key.
    #[error("project key already in use: {0}")]
    DuplicateKey(ProjectKey),

    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The user is not in the directory.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(ProjectRepositoryError),
}

impl From<ProjectRepositoryError> for ProjectServiceError {
    fn from(err: ProjectRepositoryError) -> Self {
        match err {
            ProjectRepositoryError::DuplicateKey(key) => Self::DuplicateKey(key),
            ProjectRepositoryError::NotFound(id) => Self::NotFound(id),
            ProjectRepositoryError::UserNotFound(id) => Self::UserNotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl ProjectServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::DuplicateKey(_) => ErrorKind::Conflict,
            Self::NotFound(_) | Self::UserNotFound(_) => ErrorKind::NotFound,
            Self::Repository(_) => ErrorKind::Persistence,
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project registry orchestration service.
#[derive(Clone)]
pub struct ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ProjectService<R, C>
where
    R: ProjectRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a project seeded with the standard workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] when the key, name or
    /// description is invalid and [`ProjectServiceError::DuplicateKey`] when
    /// the key is taken.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let key = ProjectKey::new(request.key)?;
        let name = ProjectName::new(request.name)?;
        let new_project = NewProject::new(key, name, request.description, &*self.clock)?;
        let project = self
            .repository
            .create(&new_project, &WorkflowTemplate::standard())
            .await?;
        info!(project_id = %project.id(), key = %project.key(), "created project");
        Ok(project)
    }

    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn get_project(&self, id: ProjectId) -> ProjectServiceResult<Option<Project>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Finds a project by key. The key is normalised before the lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] for a malformed key.
    pub async fn get_project_by_key(&self, key: &str) -> ProjectServiceResult<Option<Project>> {
        let project_key = ProjectKey::new(key)?;
        Ok(self.repository.find_by_key(&project_key).await?)
    }

    /// Returns every project ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn list_projects(&self) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.repository.list_all().await?)
    }

    /// Returns the projects visible to the caller: every project for an
    /// administrator, otherwise those the caller is a member of.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn list_projects_for(
        &self,
        caller: &CallerIdentity,
    ) -> ProjectServiceResult<Vec<Project>> {
        if caller.is_admin() {
            return self.list_projects().await;
        }
        Ok(self.repository.list_for_member(caller.user_id()).await?)
    }

    /// Applies name and description changes. The key never changes.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project and
    /// [`ProjectServiceError::Domain`] for invalid values.
    pub async fn update_project(
        &self,
        id: ProjectId,
        request: UpdateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let mut project = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ProjectServiceError::NotFound(id))?;
        if let Some(name) = request.name {
            project.rename(ProjectName::new(name)?);
        }
        if let Some(description) = request.description {
            project.describe(description)?;
        }
        self.repository.update(&project).await?;
        info!(project_id = %id, "updated project");
        Ok(project)
    }

    /// Deletes a project together with its statuses, tickets, column
    /// preferences and memberships.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project.
    pub async fn delete_project(&self, id: ProjectId) -> ProjectServiceResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProjectServiceError::NotFound(id));
        }
        info!(project_id = %id, "deleted project");
        Ok(())
    }

    /// Adds a member. Returns `false` when the user already was one.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::NotFound`] for an unknown project and
    /// [`ProjectServiceError::UserNotFound`] for a user missing from the
    /// directory.
    pub async fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectServiceResult<bool> {
        let added = self.repository.add_member(project_id, user_id).await?;
        if added {
            info!(%project_id, %user_id, "added project member");
        }
        Ok(added)
    }

    /// Removes a member. Returns `false` when the user was not one.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the change fails.
    pub async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectServiceResult<bool> {
        let removed = self.repository.remove_member(project_id, user_id).await?;
        if removed {
            info!(%project_id, %user_id, "removed project member");
        }
        Ok(removed)
    }

    /// Lists the members of a project ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when the lookup fails.
    pub async fn list_members(&self, project_id: ProjectId) -> ProjectServiceResult<Vec<User>> {
        Ok(self.repository.list_members(project_id).await?)
    }
}
