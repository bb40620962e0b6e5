//! View models returned by the board facade.

use crate::workflow::domain::{ColumnPreference, ProjectStatus, StatusId};
use serde::Serialize;

/// Name shown for a column whose status cannot be resolved.
pub const UNKNOWN_STATUS_NAME: &str = "Unknown";

/// One workflow status as shown in board settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    /// Status identifier.
    pub id: StatusId,
    /// Display name.
    pub name: String,
    /// Position in the canonical order.
    pub sort_order: u32,
    /// Whether new tickets may land here by default.
    pub is_default: bool,
}

impl From<&ProjectStatus> for StatusView {
    fn from(status: &ProjectStatus) -> Self {
        Self {
            id: status.id(),
            name: status.name().as_str().to_owned(),
            sort_order: status.sort_order().value(),
            is_default: status.is_default(),
        }
    }
}

/// One column of a user's Kanban board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanbanColumnView {
    /// Status the column shows.
    pub status_id: StatusId,
    /// Status name, or [`UNKNOWN_STATUS_NAME`].
    pub status_name: String,
    /// Left-to-right position.
    pub position: i32,
    /// Whether the column is shown.
    pub is_visible: bool,
}

impl KanbanColumnView {
    /// Renders `column` using the names in `statuses`.
    #[must_use]
    pub fn render(column: &ColumnPreference, statuses: &[ProjectStatus]) -> Self {
        let status_name = statuses
            .iter()
            .find(|status| status.id() == column.status_id())
            .map_or_else(
                || UNKNOWN_STATUS_NAME.to_owned(),
                |status| status.name().as_str().to_owned(),
            );
        Self {
            status_id: column.status_id(),
            status_name,
            position: column.position(),
            is_visible: column.is_visible(),
        }
    }
}
