//! Column preference store: per-user Kanban layout kept in step with the
//! project's status set.

use super::{WorkflowServiceError, WorkflowServiceResult};
use crate::project::domain::{ProjectId, UserId};
use crate::workflow::{
    domain::{
        ColumnInput, ColumnPreference, order_by_position, plan_missing_columns,
        plan_saved_columns,
    },
    ports::WorkflowRepository,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Materialises and reconciles per-user column preferences.
#[derive(Clone)]
pub struct ColumnPreferenceService<W>
where
    W: WorkflowRepository,
{
    repository: Arc<W>,
}

impl<W> ColumnPreferenceService<W>
where
    W: WorkflowRepository,
{
    /// Creates a new column preference service.
    #[must_use]
    pub const fn new(repository: Arc<W>) -> Self {
        Self { repository }
    }

    /// Returns the user's columns for the project, creating a visible column
    /// at the end of the board for every status that has none yet.
    ///
    /// Stored rows are never modified, so repeated calls are idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Repository`] when the rows cannot be
    /// read or written.
    pub async fn get_or_create_columns(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> WorkflowServiceResult<Vec<ColumnPreference>> {
        let (columns, created) = self
            .repository
            .transaction(move |tx| {
                let statuses = tx.list_statuses(project_id)?;
                let existing = tx.list_column_preferences(project_id, user_id)?;
                let missing = plan_missing_columns(project_id, user_id, &statuses, &existing);
                if missing.is_empty() {
                    let mut columns = existing;
                    order_by_position(&mut columns);
                    return Ok((columns, 0));
                }
                // A concurrent first load may have stored some of these rows.
                let created = tx.insert_missing_column_preferences(&missing)?.len();
                let mut columns = tx.list_column_preferences(project_id, user_id)?;
                order_by_position(&mut columns);
                Ok::<_, WorkflowServiceError>((columns, created))
            })
            .await?;
        if created > 0 {
            info!(%project_id, %user_id, created, "created missing kanban columns");
        } else {
            debug!(%project_id, %user_id, count = columns.len(), "loaded kanban columns");
        }
        Ok(columns)
    }

    /// Applies a submitted layout to the user's columns.
    ///
    /// Statuses in `incoming` take the submitted position and visibility.
    /// Statuses left out are hidden rather than deleted, and entries for
    /// statuses outside the project are ignored. All writes happen in one
    /// transaction. Returns the resulting columns ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Repository`] when the rows cannot be
    /// read or written; nothing is written in that case.
    pub async fn save_columns(
        &self,
        project_id: ProjectId,
        user_id: UserId,
        incoming: Vec<ColumnInput>,
    ) -> WorkflowServiceResult<Vec<ColumnPreference>> {
        let (columns, inserted, updated) = self
            .repository
            .transaction(move |tx| {
                let statuses = tx.list_statuses(project_id)?;
                let existing = tx.list_column_preferences(project_id, user_id)?;
                let plan =
                    plan_saved_columns(project_id, user_id, &statuses, &existing, &incoming);
                let (inserts, updates) = plan.into_parts();
                for row in &updates {
                    tx.update_column_preference(row)?;
                }
                tx.insert_column_preferences(&inserts)?;
                let mut columns = tx.list_column_preferences(project_id, user_id)?;
                order_by_position(&mut columns);
                Ok::<_, WorkflowServiceError>((columns, inserts.len(), updates.len()))
            })
            .await?;
        info!(%project_id, %user_id, inserted, updated, "saved kanban columns");
        Ok(columns)
    }
}
