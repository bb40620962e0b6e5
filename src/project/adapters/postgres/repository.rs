//! `PostgreSQL` repository implementation for projects and membership.

use super::models::{NewProjectRow, ProjectChangeset, ProjectRow};
use crate::persistence::postgres::schema::{
    project_members, project_statuses, projects, tickets, users,
};
use crate::persistence::postgres::{PgPool, unique_violation, with_connection};
use crate::project::{
    domain::{
        NewProject, PersistedProjectData, Project, ProjectId, ProjectKey, ProjectName, UserId,
    },
    ports::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
};
use crate::user::adapters::postgres::{models::UserRow, row_to_user};
use crate::user::domain::User;
use crate::workflow::adapters::postgres::models::NewStatusRow;
use crate::workflow::domain::WorkflowTemplate;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

const PROJECT_KEY_INDEX: &str = "idx_projects_key";

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: PgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        with_connection(&self.pool, f).await
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn create(
        &self,
        project: &NewProject,
        workflow: &WorkflowTemplate,
    ) -> ProjectRepositoryResult<Project> {
        let key = project.key().clone();
        let new_row = NewProjectRow {
            key: key.as_str().to_owned(),
            name: project.name().as_str().to_owned(),
            description: project.description().map(str::to_owned),
            created_at: project.created_at(),
        };
        let template = workflow.clone();

        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                let row = diesel::insert_into(projects::table)
                    .values(&new_row)
                    .returning(ProjectRow::as_returning())
                    .get_result::<ProjectRow>(tx)
                    .map_err(|err| {
                        if unique_violation(&err) == Some(PROJECT_KEY_INDEX) {
                            ProjectRepositoryError::DuplicateKey(key.clone())
                        } else {
                            ProjectRepositoryError::persistence(err)
                        }
                    })?;
                let project_id = ProjectId::new(row.id);
                let status_rows = template
                    .to_new_statuses(project_id)
                    .iter()
                    .map(NewStatusRow::try_from)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(ProjectRepositoryError::persistence)?;
                if !status_rows.is_empty() {
                    diesel::insert_into(project_statuses::table)
                        .values(&status_rows)
                        .execute(tx)?;
                }
                row_to_project(row)
            })
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let project_id = project.id();
        let changes = ProjectChangeset {
            name: project.name().as_str().to_owned(),
            description: project.description().map(str::to_owned),
        };
        self.run_blocking(move |connection| {
            let updated = diesel::update(projects::table.filter(projects::id.eq(project_id.value())))
                .set(&changes)
                .execute(connection)?;
            if updated == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: ProjectId) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                // Tickets hold their status through a restricting key, so they
                // go before the cascade removes the statuses.
                diesel::delete(tickets::table.filter(tickets::project_id.eq(id.value())))
                    .execute(tx)?;
                let deleted = diesel::delete(projects::table.filter(projects::id.eq(id.value())))
                    .execute(tx)?;
                Ok(deleted > 0)
            })
        })
        .await
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(id.value()))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn find_by_key(&self, key: &ProjectKey) -> ProjectRepositoryResult<Option<Project>> {
        let lookup_key = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::key.eq(lookup_key))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list_all(&self) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(|connection| {
            let rows = projects::table
                .order((projects::name.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn list_for_member(&self, user_id: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        self.run_blocking(move |connection| {
            let rows = projects::table
                .inner_join(project_members::table)
                .filter(project_members::user_id.eq(user_id.value()))
                .order((projects::name.asc(), projects::id.asc()))
                .select(ProjectRow::as_select())
                .load::<ProjectRow>(connection)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }

    async fn add_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, ProjectRepositoryError, _>(|tx| {
                let exists = diesel::select(diesel::dsl::exists(
                    projects::table.filter(projects::id.eq(project_id.value())),
                ))
                .get_result::<bool>(tx)?;
                if !exists {
                    return Err(ProjectRepositoryError::NotFound(project_id));
                }
                let user_exists = diesel::select(diesel::dsl::exists(
                    users::table.filter(users::id.eq(user_id.value())),
                ))
                .get_result::<bool>(tx)?;
                if !user_exists {
                    return Err(ProjectRepositoryError::UserNotFound(user_id));
                }
                let inserted = diesel::insert_into(project_members::table)
                    .values((
                        project_members::project_id.eq(project_id.value()),
                        project_members::user_id.eq(user_id.value()),
                    ))
                    .on_conflict_do_nothing()
                    .execute(tx)?;
                Ok(inserted > 0)
            })
        })
        .await
    }

    async fn remove_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(
                project_members::table
                    .filter(project_members::project_id.eq(project_id.value()))
                    .filter(project_members::user_id.eq(user_id.value())),
            )
            .execute(connection)?;
            Ok(removed > 0)
        })
        .await
    }

    async fn list_members(&self, project_id: ProjectId) -> ProjectRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .inner_join(project_members::table)
                .filter(project_members::project_id.eq(project_id.value()))
                .order((users::display_name.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)?;
            rows.into_iter()
                .map(|row| row_to_user(row).map_err(ProjectRepositoryError::invalid_persisted_data))
                .collect()
        })
        .await
    }

    async fn is_member(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> ProjectRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            Ok(diesel::select(diesel::dsl::exists(
                project_members::table
                    .filter(project_members::project_id.eq(project_id.value()))
                    .filter(project_members::user_id.eq(user_id.value())),
            ))
            .get_result::<bool>(connection)?)
        })
        .await
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        key,
        name,
        description,
        created_at,
    } = row;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::new(id),
        key: ProjectKey::new(key).map_err(ProjectRepositoryError::invalid_persisted_data)?,
        name: ProjectName::new(name).map_err(ProjectRepositoryError::invalid_persisted_data)?,
        description,
        created_at,
    }))
}
