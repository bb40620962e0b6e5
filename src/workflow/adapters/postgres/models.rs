//! Diesel row models for statuses and column preferences.

use crate::persistence::postgres::schema::{kanban_column_preferences, project_statuses};
use crate::project::domain::{ProjectId, UserId};
use crate::workflow::domain::{
    ColumnPreference, ColumnPreferenceId, NewColumnPreference, NewProjectStatus,
    PersistedColumnData, PersistedStatusData, ProjectStatus, SortOrder, StatusId, StatusName,
    WorkflowDomainError,
};
use diesel::prelude::*;

/// Query result row for workflow statuses.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = project_statuses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StatusRow {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub is_default: bool,
}

impl TryFrom<StatusRow> for ProjectStatus {
    type Error = WorkflowDomainError;

    fn try_from(row: StatusRow) -> Result<Self, Self::Error> {
        Ok(Self::from_persisted(PersistedStatusData {
            id: StatusId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            name: StatusName::new(row.name)?,
            sort_order: SortOrder::try_from(row.sort_order)?,
            is_default: row.is_default,
        }))
    }
}

/// Insert model for workflow statuses.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = project_statuses)]
pub(crate) struct NewStatusRow {
    pub project_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub is_default: bool,
}

impl TryFrom<&NewProjectStatus> for NewStatusRow {
    type Error = WorkflowDomainError;

    fn try_from(status: &NewProjectStatus) -> Result<Self, Self::Error> {
        Ok(Self {
            project_id: status.project_id().value(),
            name: status.name().as_str().to_owned(),
            sort_order: i32::try_from(status.sort_order())?,
            is_default: status.is_default(),
        })
    }
}

/// Query result row for column preferences.
#[derive(Debug, Clone, Copy, Queryable, Selectable)]
#[diesel(table_name = kanban_column_preferences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ColumnPreferenceRow {
    pub id: i64,
    pub project_id: i64,
    pub user_id: i64,
    pub status_id: i64,
    pub position: i32,
    pub is_visible: bool,
}

impl From<ColumnPreferenceRow> for ColumnPreference {
    fn from(row: ColumnPreferenceRow) -> Self {
        Self::from_persisted(PersistedColumnData {
            id: ColumnPreferenceId::new(row.id),
            project_id: ProjectId::new(row.project_id),
            user_id: UserId::new(row.user_id),
            status_id: StatusId::new(row.status_id),
            position: row.position,
            is_visible: row.is_visible,
        })
    }
}

/// Insert model for column preferences.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = kanban_column_preferences)]
pub(crate) struct NewColumnPreferenceRow {
    pub project_id: i64,
    pub user_id: i64,
    pub status_id: i64,
    pub position: i32,
    pub is_visible: bool,
}

impl From<&NewColumnPreference> for NewColumnPreferenceRow {
    fn from(row: &NewColumnPreference) -> Self {
        Self {
            project_id: row.project_id.value(),
            user_id: row.user_id.value(),
            status_id: row.status_id.value(),
            position: row.position,
            is_visible: row.is_visible,
        }
    }
}
