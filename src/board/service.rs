//! Access-checked board operations.

use super::{BoardError, BoardResult, KanbanColumnView, StatusView};
use crate::project::{
    domain::{CallerIdentity, ProjectId},
    ports::AccessGate,
};
use crate::workflow::{
    domain::{ColumnInput, ColumnPreference, StatusId},
    ports::WorkflowRepository,
    services::{ColumnPreferenceService, StatusRegistryService},
};
use std::sync::Arc;
use tracing::debug;

/// Entry point for board settings and the per-user Kanban layout.
#[derive(Clone)]
pub struct KanbanBoardService<G, W>
where
    G: AccessGate,
    W: WorkflowRepository,
{
    gate: Arc<G>,
    statuses: StatusRegistryService<W>,
    columns: ColumnPreferenceService<W>,
}

impl<G, W> KanbanBoardService<G, W>
where
    G: AccessGate,
    W: WorkflowRepository,
{
    /// Creates a board service over one workflow repository.
    #[must_use]
    pub fn new(gate: Arc<G>, workflow: Arc<W>) -> Self {
        Self {
            gate,
            statuses: StatusRegistryService::new(Arc::clone(&workflow)),
            columns: ColumnPreferenceService::new(workflow),
        }
    }

    /// Lists the project's statuses in canonical order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AccessDenied`] when the caller may not reach
    /// the project.
    pub async fn list_statuses(
        &self,
        caller: &CallerIdentity,
        project_id: ProjectId,
    ) -> BoardResult<Vec<StatusView>> {
        self.authorise(caller, project_id).await?;
        let statuses = self.statuses.list_statuses(project_id).await?;
        Ok(statuses.iter().map(StatusView::from).collect())
    }

    /// Appends a status to the project's workflow.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AccessDenied`] when the caller may not reach
    /// the project and [`BoardError::Workflow`] for invalid or duplicate
    /// names.
    pub async fn create_status(
        &self,
        caller: &CallerIdentity,
        project_id: ProjectId,
        name: impl Into<String> + Send,
    ) -> BoardResult<StatusView> {
        self.authorise(caller, project_id).await?;
        let status = self.statuses.create_status(project_id, name).await?;
        Ok(StatusView::from(&status))
    }

    /// Renames a status.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AccessDenied`] when the caller may not reach
    /// the project and [`BoardError::Workflow`] for unknown statuses or
    /// invalid names.
    pub async fn update_status(
        &self,
        caller: &CallerIdentity,
        project_id: ProjectId,
        status_id: StatusId,
        name: impl Into<String> + Send,
    ) -> BoardResult<StatusView> {
        self.authorise(caller, project_id).await?;
        let status = self
            .statuses
            .update_status(project_id, status_id, name)
            .await?;
        Ok(StatusView::from(&status))
    }

    /// Deletes an unused status.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AccessDenied`] when the caller may not reach
    /// the project and [`BoardError::Workflow`] when the status is unknown
    /// or still referenced by tickets.
    pub async fn delete_status(
        &self,
        caller: &CallerIdentity,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> BoardResult<()> {
        self.authorise(caller, project_id).await?;
        self.statuses.delete_status(project_id, status_id).await?;
        Ok(())
    }

    /// Returns the caller's board columns ordered by position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AccessDenied`] when the caller may not reach
    /// the project.
    pub async fn get_columns(
        &self,
        caller: &CallerIdentity,
        project_id: ProjectId,
    ) -> BoardResult<Vec<KanbanColumnView>> {
        self.authorise(caller, project_id).await?;
        let columns = self
            .columns
            .get_or_create_columns(project_id, caller.user_id())
            .await?;
        self.render(project_id, &columns).await
    }

    /// Saves the caller's layout and returns the reconciled columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::AccessDenied`] when the caller may not reach
    /// the project.
    pub async fn save_columns(
        &self,
        caller: &CallerIdentity,
        project_id: ProjectId,
        incoming: Vec<ColumnInput>,
    ) -> BoardResult<Vec<KanbanColumnView>> {
        self.authorise(caller, project_id).await?;
        let columns = self
            .columns
            .save_columns(project_id, caller.user_id(), incoming)
            .await?;
        self.render(project_id, &columns).await
    }

    async fn authorise(&self, caller: &CallerIdentity, project_id: ProjectId) -> BoardResult<()> {
        if self.gate.has_project_access(project_id, caller).await? {
            return Ok(());
        }
        debug!(%project_id, user_id = %caller.user_id(), "board access denied");
        Err(BoardError::AccessDenied {
            project_id,
            user_id: caller.user_id(),
        })
    }

    async fn render(
        &self,
        project_id: ProjectId,
        columns: &[ColumnPreference],
    ) -> BoardResult<Vec<KanbanColumnView>> {
        let statuses = self.statuses.list_statuses(project_id).await?;
        Ok(columns
            .iter()
            .map(|column| KanbanColumnView::render(column, &statuses))
            .collect())
    }
}
