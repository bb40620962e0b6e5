//! `PostgreSQL` repository implementation for workflow storage.

use super::models::{ColumnPreferenceRow, NewColumnPreferenceRow, NewStatusRow, StatusRow};
use crate::persistence::postgres::schema::{
    kanban_column_preferences, project_statuses, projects, tickets,
};
use crate::persistence::postgres::{PgPool, foreign_key_violation, unique_violation, with_connection};
use crate::project::domain::{ProjectId, UserId};
use crate::workflow::{
    domain::{
        ColumnPreference, NewColumnPreference, NewProjectStatus, ProjectStatus, SortOrder,
        StatusId, StatusName,
    },
    ports::{
        WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult,
        WorkflowTransaction,
    },
};
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sql_types::{Bool, Text};

const STATUS_NAME_INDEX: &str = "idx_project_statuses_project_name";
const COLUMN_OWNER_INDEX: &str = "idx_kanban_column_preferences_owner_status";
const TICKET_STATUS_FK: &str = "fk_tickets_status";

/// `PostgreSQL`-backed workflow repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkflowRepository {
    pool: PgPool,
}

impl PostgresWorkflowRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowRepository for PostgresWorkflowRepository {
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WorkflowTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<WorkflowRepositoryError> + Send + 'static,
    {
        with_connection(&self.pool, move |connection| {
            Ok::<_, WorkflowRepositoryError>(run_transaction(connection, work))
        })
        .await?
    }
}

/// Failure of a Diesel transaction closure.
enum TransactionFailure<E> {
    Work(E),
    Database(DieselError),
}

impl<E> From<DieselError> for TransactionFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

fn run_transaction<T, E, F>(connection: &mut PgConnection, work: F) -> Result<T, E>
where
    F: FnOnce(&mut dyn WorkflowTransaction) -> Result<T, E>,
    E: From<WorkflowRepositoryError>,
{
    connection
        .transaction::<T, TransactionFailure<E>, _>(|conn| {
            let mut transaction = PgWorkflowTransaction { connection: conn };
            work(&mut transaction).map_err(TransactionFailure::Work)
        })
        .map_err(|failure| match failure {
            TransactionFailure::Work(err) => err,
            TransactionFailure::Database(err) => E::from(WorkflowRepositoryError::persistence(err)),
        })
}

struct PgWorkflowTransaction<'a> {
    connection: &'a mut PgConnection,
}

impl WorkflowTransaction for PgWorkflowTransaction<'_> {
    fn project_exists(&mut self, project_id: ProjectId) -> WorkflowRepositoryResult<bool> {
        diesel::select(diesel::dsl::exists(
            projects::table.filter(projects::id.eq(project_id.value())),
        ))
        .get_result::<bool>(self.connection)
        .map_err(WorkflowRepositoryError::persistence)
    }

    fn list_statuses(
        &mut self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Vec<ProjectStatus>> {
        let rows = project_statuses::table
            .filter(project_statuses::project_id.eq(project_id.value()))
            .order((project_statuses::sort_order.asc(), project_statuses::id.asc()))
            .select(StatusRow::as_select())
            .load::<StatusRow>(self.connection)
            .map_err(WorkflowRepositoryError::persistence)?;
        rows.into_iter().map(row_to_status).collect()
    }

    fn find_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<Option<ProjectStatus>> {
        let row = project_statuses::table
            .filter(project_statuses::id.eq(status_id.value()))
            .filter(project_statuses::project_id.eq(project_id.value()))
            .select(StatusRow::as_select())
            .first::<StatusRow>(self.connection)
            .optional()
            .map_err(WorkflowRepositoryError::persistence)?;
        row.map(row_to_status).transpose()
    }

    fn lock_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<Option<ProjectStatus>> {
        let row = project_statuses::table
            .filter(project_statuses::id.eq(status_id.value()))
            .filter(project_statuses::project_id.eq(project_id.value()))
            .select(StatusRow::as_select())
            .for_update()
            .first::<StatusRow>(self.connection)
            .optional()
            .map_err(WorkflowRepositoryError::persistence)?;
        row.map(row_to_status).transpose()
    }

    fn status_name_exists(
        &mut self,
        project_id: ProjectId,
        name: &StatusName,
        excluding: Option<StatusId>,
    ) -> WorkflowRepositoryResult<bool> {
        let mut query = project_statuses::table
            .filter(project_statuses::project_id.eq(project_id.value()))
            .filter(
                sql::<Bool>("lower(name) = lower(")
                    .bind::<Text, _>(name.as_str().to_owned())
                    .sql(")"),
            )
            .select(project_statuses::id)
            .into_boxed();
        if let Some(status_id) = excluding {
            query = query.filter(project_statuses::id.ne(status_id.value()));
        }
        let found = query
            .first::<i64>(self.connection)
            .optional()
            .map_err(WorkflowRepositoryError::persistence)?;
        Ok(found.is_some())
    }

    fn max_sort_order(
        &mut self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Option<SortOrder>> {
        let max = project_statuses::table
            .filter(project_statuses::project_id.eq(project_id.value()))
            .select(diesel::dsl::max(project_statuses::sort_order))
            .first::<Option<i32>>(self.connection)
            .map_err(WorkflowRepositoryError::persistence)?;
        max.map(SortOrder::try_from)
            .transpose()
            .map_err(WorkflowRepositoryError::invalid_persisted_data)
    }

    fn insert_status(
        &mut self,
        status: &NewProjectStatus,
    ) -> WorkflowRepositoryResult<ProjectStatus> {
        let new_row =
            NewStatusRow::try_from(status).map_err(WorkflowRepositoryError::persistence)?;
        let row = diesel::insert_into(project_statuses::table)
            .values(&new_row)
            .returning(StatusRow::as_returning())
            .get_result::<StatusRow>(self.connection)
            .map_err(|err| {
                map_status_name_violation(err, status.project_id(), status.name())
            })?;
        row_to_status(row)
    }

    fn rename_status(&mut self, status: &ProjectStatus) -> WorkflowRepositoryResult<()> {
        let updated = diesel::update(
            project_statuses::table.filter(project_statuses::id.eq(status.id().value())),
        )
        .set(project_statuses::name.eq(status.name().as_str()))
        .execute(self.connection)
        .map_err(|err| map_status_name_violation(err, status.project_id(), status.name()))?;
        if updated == 0 {
            return Err(WorkflowRepositoryError::StatusNotFound(status.id()));
        }
        Ok(())
    }

    fn delete_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<bool> {
        if self.lock_status(project_id, status_id)?.is_none() {
            return Ok(false);
        }
        if self.status_in_use(status_id)? {
            return Err(WorkflowRepositoryError::StatusInUse(status_id));
        }
        let deleted = diesel::delete(
            project_statuses::table.filter(project_statuses::id.eq(status_id.value())),
        )
        .execute(self.connection)
        .map_err(|err| {
            if foreign_key_violation(&err) == Some(TICKET_STATUS_FK) {
                WorkflowRepositoryError::StatusInUse(status_id)
            } else {
                WorkflowRepositoryError::persistence(err)
            }
        })?;
        Ok(deleted > 0)
    }

    fn status_in_use(&mut self, status_id: StatusId) -> WorkflowRepositoryResult<bool> {
        diesel::select(diesel::dsl::exists(
            tickets::table.filter(tickets::status_id.eq(status_id.value())),
        ))
        .get_result::<bool>(self.connection)
        .map_err(WorkflowRepositoryError::persistence)
    }

    fn list_column_preferences(
        &mut self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>> {
        let rows = kanban_column_preferences::table
            .filter(kanban_column_preferences::project_id.eq(project_id.value()))
            .filter(kanban_column_preferences::user_id.eq(user_id.value()))
            .order(kanban_column_preferences::id.asc())
            .select(ColumnPreferenceRow::as_select())
            .load::<ColumnPreferenceRow>(self.connection)
            .map_err(WorkflowRepositoryError::persistence)?;
        Ok(rows.into_iter().map(ColumnPreference::from).collect())
    }

    fn insert_column_preferences(
        &mut self,
        rows: &[NewColumnPreference],
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>> {
        let Some(first) = rows.first() else {
            return Ok(Vec::new());
        };
        let first_status = first.status_id;
        let new_rows: Vec<NewColumnPreferenceRow> =
            rows.iter().map(NewColumnPreferenceRow::from).collect();
        let stored = diesel::insert_into(kanban_column_preferences::table)
            .values(&new_rows)
            .returning(ColumnPreferenceRow::as_returning())
            .get_results::<ColumnPreferenceRow>(self.connection)
            .map_err(|err| {
                if unique_violation(&err) == Some(COLUMN_OWNER_INDEX) {
                    WorkflowRepositoryError::DuplicateColumnPreference(first_status)
                } else {
                    WorkflowRepositoryError::persistence(err)
                }
            })?;
        Ok(stored.into_iter().map(ColumnPreference::from).collect())
    }

    fn insert_missing_column_preferences(
        &mut self,
        rows: &[NewColumnPreference],
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let new_rows: Vec<NewColumnPreferenceRow> =
            rows.iter().map(NewColumnPreferenceRow::from).collect();
        let stored = diesel::insert_into(kanban_column_preferences::table)
            .values(&new_rows)
            .on_conflict((
                kanban_column_preferences::project_id,
                kanban_column_preferences::user_id,
                kanban_column_preferences::status_id,
            ))
            .do_nothing()
            .returning(ColumnPreferenceRow::as_returning())
            .get_results::<ColumnPreferenceRow>(self.connection)
            .map_err(WorkflowRepositoryError::persistence)?;
        Ok(stored.into_iter().map(ColumnPreference::from).collect())
    }

    fn update_column_preference(
        &mut self,
        row: &ColumnPreference,
    ) -> WorkflowRepositoryResult<()> {
        let updated = diesel::update(
            kanban_column_preferences::table
                .filter(kanban_column_preferences::id.eq(row.id().value())),
        )
        .set((
            kanban_column_preferences::position.eq(row.position()),
            kanban_column_preferences::is_visible.eq(row.is_visible()),
        ))
        .execute(self.connection)
        .map_err(WorkflowRepositoryError::persistence)?;
        if updated == 0 {
            return Err(WorkflowRepositoryError::ColumnPreferenceNotFound(
                row.status_id(),
            ));
        }
        Ok(())
    }
}

fn row_to_status(row: StatusRow) -> WorkflowRepositoryResult<ProjectStatus> {
    ProjectStatus::try_from(row).map_err(WorkflowRepositoryError::invalid_persisted_data)
}

fn map_status_name_violation(
    err: DieselError,
    project_id: ProjectId,
    name: &StatusName,
) -> WorkflowRepositoryError {
    if unique_violation(&err) == Some(STATUS_NAME_INDEX) {
        WorkflowRepositoryError::DuplicateStatusName {
            project_id,
            name: name.clone(),
        }
    } else {
        WorkflowRepositoryError::persistence(err)
    }
}
