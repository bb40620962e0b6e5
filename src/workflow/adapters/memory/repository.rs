//! Workflow repository over the shared in-memory database.

use crate::persistence::InMemoryDatabase;
use crate::persistence::memory::Tables;
use crate::project::domain::{ProjectId, UserId};
use crate::workflow::{
    domain::{
        ColumnPreference, ColumnPreferenceId, NewColumnPreference, NewProjectStatus,
        ProjectStatus, SortOrder, StatusId, StatusName,
    },
    ports::{
        WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult,
        WorkflowTransaction,
    },
};
use async_trait::async_trait;

/// Thread-safe in-memory workflow repository.
///
/// Shares its [`InMemoryDatabase`] with the project and ticket repositories
/// so that ownership and in-use checks see the same rows.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowRepository {
    database: InMemoryDatabase,
}

impl InMemoryWorkflowRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn WorkflowTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<WorkflowRepositoryError> + Send + 'static,
    {
        self.database
            .transaction(|tables| {
                let mut transaction = MemoryWorkflowTransaction { tables };
                work(&mut transaction)
            })
            .map_err(WorkflowRepositoryError::from)?
    }
}

struct MemoryWorkflowTransaction<'a> {
    tables: &'a mut Tables,
}

impl MemoryWorkflowTransaction<'_> {
    fn owned_status(&self, project_id: ProjectId, status_id: StatusId) -> Option<ProjectStatus> {
        self.tables
            .statuses
            .get(&status_id)
            .filter(|status| status.project_id() == project_id)
            .cloned()
    }

    fn name_taken(
        &self,
        project_id: ProjectId,
        name: &StatusName,
        excluding: Option<StatusId>,
    ) -> bool {
        self.tables.statuses.values().any(|status| {
            status.project_id() == project_id
                && Some(status.id()) != excluding
                && status.name().collides_with(name)
        })
    }
}

impl WorkflowTransaction for MemoryWorkflowTransaction<'_> {
    fn project_exists(&mut self, project_id: ProjectId) -> WorkflowRepositoryResult<bool> {
        Ok(self.tables.projects.contains_key(&project_id))
    }

    fn list_statuses(
        &mut self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Vec<ProjectStatus>> {
        Ok(self.tables.project_statuses(project_id))
    }

    fn find_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<Option<ProjectStatus>> {
        Ok(self.owned_status(project_id, status_id))
    }

    fn lock_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<Option<ProjectStatus>> {
        // The enclosing transaction already holds the database write lock.
        Ok(self.owned_status(project_id, status_id))
    }

    fn status_name_exists(
        &mut self,
        project_id: ProjectId,
        name: &StatusName,
        excluding: Option<StatusId>,
    ) -> WorkflowRepositoryResult<bool> {
        Ok(self.name_taken(project_id, name, excluding))
    }

    fn max_sort_order(
        &mut self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Option<SortOrder>> {
        Ok(self
            .tables
            .statuses
            .values()
            .filter(|status| status.project_id() == project_id)
            .map(ProjectStatus::sort_order)
            .max())
    }

    fn insert_status(
        &mut self,
        status: &NewProjectStatus,
    ) -> WorkflowRepositoryResult<ProjectStatus> {
        if self.name_taken(status.project_id(), status.name(), None) {
            return Err(WorkflowRepositoryError::DuplicateStatusName {
                project_id: status.project_id(),
                name: status.name().clone(),
            });
        }
        let id = StatusId::new(self.tables.next_id());
        let stored = status.clone().into_status(id);
        self.tables.statuses.insert(id, stored.clone());
        Ok(stored)
    }

    fn rename_status(&mut self, status: &ProjectStatus) -> WorkflowRepositoryResult<()> {
        if !self.tables.statuses.contains_key(&status.id()) {
            return Err(WorkflowRepositoryError::StatusNotFound(status.id()));
        }
        if self.name_taken(status.project_id(), status.name(), Some(status.id())) {
            return Err(WorkflowRepositoryError::DuplicateStatusName {
                project_id: status.project_id(),
                name: status.name().clone(),
            });
        }
        if let Some(stored) = self.tables.statuses.get_mut(&status.id()) {
            stored.rename(status.name().clone());
        }
        Ok(())
    }

    fn delete_status(
        &mut self,
        project_id: ProjectId,
        status_id: StatusId,
    ) -> WorkflowRepositoryResult<bool> {
        if self.owned_status(project_id, status_id).is_none() {
            return Ok(false);
        }
        if self.status_in_use(status_id)? {
            return Err(WorkflowRepositoryError::StatusInUse(status_id));
        }
        Ok(self.tables.remove_status(status_id))
    }

    fn status_in_use(&mut self, status_id: StatusId) -> WorkflowRepositoryResult<bool> {
        Ok(self
            .tables
            .tickets
            .values()
            .any(|ticket| ticket.status_id() == status_id))
    }

    fn list_column_preferences(
        &mut self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>> {
        Ok(self
            .tables
            .column_preferences
            .values()
            .filter(|row| row.project_id() == project_id && row.user_id() == user_id)
            .copied()
            .collect())
    }

    fn insert_column_preferences(
        &mut self,
        rows: &[NewColumnPreference],
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>> {
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let duplicate = self.tables.column_preferences.values().any(|existing| {
                existing.project_id() == row.project_id
                    && existing.user_id() == row.user_id
                    && existing.status_id() == row.status_id
            });
            if duplicate {
                return Err(WorkflowRepositoryError::DuplicateColumnPreference(
                    row.status_id,
                ));
            }
            let id = ColumnPreferenceId::new(self.tables.next_id());
            let preference = row.into_preference(id);
            self.tables.column_preferences.insert(id, preference);
            stored.push(preference);
        }
        Ok(stored)
    }

    fn insert_missing_column_preferences(
        &mut self,
        rows: &[NewColumnPreference],
    ) -> WorkflowRepositoryResult<Vec<ColumnPreference>> {
        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let exists = self.tables.column_preferences.values().any(|existing| {
                existing.project_id() == row.project_id
                    && existing.user_id() == row.user_id
                    && existing.status_id() == row.status_id
            });
            if exists {
                continue;
            }
            let id = ColumnPreferenceId::new(self.tables.next_id());
            let preference = row.into_preference(id);
            self.tables.column_preferences.insert(id, preference);
            stored.push(preference);
        }
        Ok(stored)
    }

    fn update_column_preference(
        &mut self,
        row: &ColumnPreference,
    ) -> WorkflowRepositoryResult<()> {
        let stored = self
            .tables
            .column_preferences
            .get_mut(&row.id())
            .ok_or(WorkflowRepositoryError::ColumnPreferenceNotFound(row.status_id()))?;
        *stored = *row;
        Ok(())
    }
}
