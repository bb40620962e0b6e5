//! Project repository over the shared in-memory database.

use crate::persistence::InMemoryDatabase;
use crate::project::{
    domain::{NewProject, Project, ProjectId, ProjectKey, UserId},
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::user::domain::{User, sort_by_display_name};
use crate::workflow::domain::{StatusId, WorkflowTemplate};
use async_trait::async_trait;

/// Thread-safe in-memory project repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectRepository {
    database: InMemoryDatabase,
}

impl InMemoryProjectRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

fn sorted_by_name(mut projects: Vec<Project>) -> Vec<Project> {
    projects.sort_by(|left, right| {
        left.name()
            .as_str()
            .cmp(right.name().as_str())
            .then(left.id().cmp(&right.id()))
    });
    projects
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn create(
        &self,
        project: &NewProject,
        workflow: &WorkflowTemplate,
    ) -> ProjectRepositoryResult<Project> {
        self.database.transaction(|tables| {
            if tables
                .projects
                .values()
                .any(|stored| stored.key() == project.key())
            {
                return Err(ProjectRepositoryError::DuplicateKey(project.key().clone()));
            }
            let project_id = ProjectId::new(tables.next_id());
            let created = project.clone().into_project(project_id);
            tables.projects.insert(project_id, created.clone());
            for status in workflow.to_new_statuses(project_id) {
                let status_id = StatusId::new(tables.next_id());
                tables
                    .statuses
                    .insert(status_id, status.into_status(status_id));
            }
            Ok(created)
        })?
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        self.database.transaction(|tables| {
            let stored = tables
                .projects
                .get_mut(&project.id())
                .ok_or(ProjectRepositoryError::NotFound(project.id()))?;
            *stored = project.clone();
            Ok(())
        })?
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        self.database
            .transaction(|tables| Ok(tables.remove_project(id)))?
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        Ok(self
            .database
            .read(|tables| tables.projects.get(&id).cloned())?)
    }

    async fn find_by_key(&self, key: &ProjectKey) -> ProjectRepositoryResult<Option<Project>> {
        Ok(self.database.read(|tables| {
            tables
                .projects
                .values()
                .find(|project| project.key() == key)
                .cloned()
        })?)
    }

    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        let projects = self
            .database
            .read(|tables| tables.projects.values().cloned().collect())?;
        Ok(sorted_by_name(projects))
    }

    async fn list_for_member(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let projects = self.database.read(|tables| {
            tables
                .members
                .iter()
                .filter(|(_, member)| *member == user_id)
                .filter_map(|(project_id, _)| tables.projects.get(project_id).cloned())
                .collect()
        })?;
        Ok(sorted_by_name(projects))
    }

    async fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool> {
        self.database.transaction(|tables| {
            if !tables.projects.contains_key(&project_id) {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            if !tables.users.contains_key(&user_id) {
                return Err(ProjectRepositoryError::UserNotFound(user_id));
            }
            Ok(tables.members.insert((project_id, user_id)))
        })?
    }

    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool> {
        self.database
            .transaction(|tables| Ok(tables.members.remove(&(project_id, user_id))))?
    }

    async fn list_members(&self, project_id: ProjectId) -> ProjectRepositoryResult<Vec<User>> {
        let mut members: Vec<User> = self.database.read(|tables| {
            tables
                .members
                .iter()
                .filter(|(project, _)| *project == project_id)
                .filter_map(|(_, user_id)| tables.users.get(user_id).cloned())
                .collect()
        })?;
        sort_by_display_name(&mut members);
        Ok(members)
    }

    async fn is_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool> {
        Ok(self
            .database
            .read(|tables| tables.members.contains(&(project_id, user_id)))?)
    }
}
