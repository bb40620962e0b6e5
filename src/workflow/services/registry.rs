//! Status registry: ordered, uniquely named workflow statuses per project.

use super::{WorkflowServiceError, WorkflowServiceResult};
use crate::project::domain::ProjectId;
use crate::workflow::{
    domain::{NewProjectStatus, ProjectStatus, StatusId, StatusName, resolve_default_status},
    ports::WorkflowRepository,
};
use std::sync::Arc;
use tracing::{debug, info};

/// CRUD over a project's workflow statuses.
#[derive(Clone)]
pub struct StatusRegistryService<W>
where
    W: WorkflowRepository,
{
    repository: Arc<W>,
}

impl<W> StatusRegistryService<W>
where
    W: WorkflowRepository,
{
    /// Creates a new status registry service.
    #[must_use]
    pub const fn new(repository: Arc<W>) -> Self {
        Self { repository }
    }

    /// Returns the project's statuses ordered by sort order, then id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Repository`] when the statuses cannot
    /// be read.
    pub async fn list_statuses(
        &self,
        project_id: ProjectId,
    ) -> WorkflowServiceResult<Vec<ProjectStatus>> {
        let statuses = self
            .repository
            .transaction(move |tx| {
                tx.list_statuses(project_id)
                    .map_err(WorkflowServiceError::from)
            })
            .await?;
        debug!(%project_id, count = statuses.len(), "listed workflow statuses");
        Ok(statuses)
    }

    /// Finds one status of the project.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Repository`] when the lookup fails.
    pub async fn find_status(
        &self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowServiceResult<Option<ProjectStatus>> {
        self.repository
            .transaction(move |tx| {
                tx.find_status(project_id, status_id)
                    .map_err(WorkflowServiceError::from)
            })
            .await
    }

    /// Appends a status to the end of the project's workflow.
    ///
    /// The name is trimmed; the new status is not the default.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Domain`] for a blank or overlong name,
    /// [`WorkflowServiceError::ProjectNotFound`] for an unknown project and
    /// [`WorkflowServiceError::DuplicateStatusName`] when the project already
    /// has a status with the same name ignoring case.
    pub async fn create_status(
        &self,
        project_id: ProjectId,
        name: impl Into<String> + Send,
    ) -> WorkflowServiceResult<ProjectStatus> {
        let status_name = StatusName::new(name)?;
        let status = self
            .repository
            .transaction(move |tx| {
                if !tx.project_exists(project_id)? {
                    return Err(WorkflowServiceError::ProjectNotFound(project_id));
                }
                if tx.status_name_exists(project_id, &status_name, None)? {
                    return Err(WorkflowServiceError::DuplicateStatusName {
                        project_id,
                        name: status_name.as_str().to_owned(),
                    });
                }
                let max = tx.max_sort_order(project_id)?;
                let new_status = NewProjectStatus::appended(project_id, status_name, max)?;
                Ok(tx.insert_status(&new_status)?)
            })
            .await?;
        info!(
            %project_id,
            status_id = %status.id(),
            sort_order = %status.sort_order(),
            "created workflow status"
        );
        Ok(status)
    }

    /// Renames a status. Sort order and default flag are unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::Domain`] for a blank or overlong name,
    /// [`WorkflowServiceError::StatusNotFound`] when the status is not part of
    /// the project and [`WorkflowServiceError::DuplicateStatusName`] when
    /// another status already uses the name.
    pub async fn update_status(
        &self,
        project_id: ProjectId,
        status_id: StatusId,
        name: impl Into<String> + Send,
    ) -> WorkflowServiceResult<ProjectStatus> {
        let status_name = StatusName::new(name)?;
        let status = self
            .repository
            .transaction(move |tx| {
                let mut status = tx.find_status(project_id, status_id)?.ok_or(
                    WorkflowServiceError::StatusNotFound {
                        project_id,
                        status_id,
                    },
                )?;
                if tx.status_name_exists(project_id, &status_name, Some(status_id))? {
                    return Err(WorkflowServiceError::DuplicateStatusName {
                        project_id,
                        name: status_name.as_str().to_owned(),
                    });
                }
                status.rename(status_name);
                tx.rename_status(&status)?;
                Ok(status)
            })
            .await?;
        info!(%project_id, %status_id, name = %status.name(), "renamed workflow status");
        Ok(status)
    }

    /// Deletes a status and the column preferences that show it.
    ///
    /// The status row is locked before the in-use check so that no ticket can
    /// bind to it between the check and the delete.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::StatusNotFound`] when the status is not
    /// part of the project and [`WorkflowServiceError::StatusInUse`] when a
    /// ticket references it.
    pub async fn delete_status(
        &self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowServiceResult<()> {
        self.repository
            .transaction(move |tx| {
                if tx.lock_status(project_id, status_id)?.is_none() {
                    return Err(WorkflowServiceError::StatusNotFound {
                        project_id,
                        status_id,
                    });
                }
                if tx.status_in_use(status_id)? {
                    return Err(WorkflowServiceError::StatusInUse(status_id));
                }
                if !tx.delete_status(project_id, status_id)? {
                    return Err(WorkflowServiceError::StatusNotFound {
                        project_id,
                        status_id,
                    });
                }
                Ok(())
            })
            .await?;
        info!(%project_id, %status_id, "deleted workflow status");
        Ok(())
    }

    /// Returns the status new tickets land in.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::ProjectNotFound`] for an unknown project
    /// and [`WorkflowServiceError::NoStatuses`] when the project has no
    /// statuses.
    pub async fn resolve_default_status_id(
        &self,
        project_id: ProjectId,
    ) -> WorkflowServiceResult<StatusId> {
        self.repository
            .transaction(move |tx| {
                if !tx.project_exists(project_id)? {
                    return Err(WorkflowServiceError::ProjectNotFound(project_id));
                }
                let statuses = tx.list_statuses(project_id)?;
                resolve_default_status(&statuses)
                    .map(ProjectStatus::id)
                    .ok_or(WorkflowServiceError::NoStatuses(project_id))
            })
            .await
    }
}
