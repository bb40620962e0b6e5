//! Per-user Kanban column preferences.

use super::{ColumnPreferenceId, StatusId};
use crate::project::domain::{ProjectId, UserId};
use serde::{Deserialize, Serialize};

/// A preference row that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewColumnPreference {
    /// Project the board belongs to.
    pub project_id: ProjectId,
    /// Owner of the preference.
    pub user_id: UserId,
    /// Status the column shows.
    pub status_id: StatusId,
    /// Left-to-right position.
    pub position: i32,
    /// Whether the column is shown.
    pub is_visible: bool,
}

impl NewColumnPreference {
    /// Attaches the identifier assigned by storage.
    #[must_use]
    pub const fn into_preference(self, id: ColumnPreferenceId) -> ColumnPreference {
        ColumnPreference {
            id,
            project_id: self.project_id,
            user_id: self.user_id,
            status_id: self.status_id,
            position: self.position,
            is_visible: self.is_visible,
        }
    }
}

/// Parameter object for reconstructing a persisted preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted identifier.
    pub id: ColumnPreferenceId,
    /// Project the board belongs to.
    pub project_id: ProjectId,
    /// Owner of the preference.
    pub user_id: UserId,
    /// Status the column shows.
    pub status_id: StatusId,
    /// Persisted position.
    pub position: i32,
    /// Persisted visibility.
    pub is_visible: bool,
}

/// One user's position and visibility choice for one status.
///
/// A negative position means the row was never placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPreference {
    id: ColumnPreferenceId,
    project_id: ProjectId,
    user_id: UserId,
    status_id: StatusId,
    position: i32,
    is_visible: bool,
}

impl ColumnPreference {
    /// Reconstructs a preference from persisted storage.
    #[must_use]
    pub const fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            user_id: data.user_id,
            status_id: data.status_id,
            position: data.position,
            is_visible: data.is_visible,
        }
    }

    /// Returns the preference identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnPreferenceId {
        self.id
    }

    /// Returns the project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the status shown by this column.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns the column position.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Returns whether the column is shown.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.is_visible
    }

    /// Returns `true` once the row has been given a position.
    #[must_use]
    pub const fn is_placed(&self) -> bool {
        self.position >= 0
    }

    /// Overwrites position and visibility.
    pub const fn set_layout(&mut self, position: i32, is_visible: bool) {
        self.position = position;
        self.is_visible = is_visible;
    }
}

/// Client-submitted layout entry for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInput {
    /// Status the entry addresses.
    pub status_id: StatusId,
    /// Requested position.
    pub position: i32,
    /// Requested visibility.
    pub is_visible: bool,
}

impl ColumnInput {
    /// Builds a layout entry.
    #[must_use]
    pub const fn new(status_id: StatusId, position: i32, is_visible: bool) -> Self {
        Self {
            status_id,
            position,
            is_visible,
        }
    }
}
