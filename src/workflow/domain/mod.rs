//! Domain model for workflow statuses and Kanban column preferences.
//!
//! Everything here is pure: ordering and default-status policy for the status
//! registry, and the reconciliation planner that turns stored preferences plus
//! a client layout into rows to insert and rows to overwrite.

mod column;
mod error;
mod ids;
mod reconcile;
mod status;
mod template;

pub use column::{ColumnInput, ColumnPreference, NewColumnPreference, PersistedColumnData};
pub use error::WorkflowDomainError;
pub use ids::{ColumnPreferenceId, StatusId};
pub use reconcile::{ColumnPlan, order_by_position, plan_missing_columns, plan_saved_columns};
pub use status::{
    NewProjectStatus, PersistedStatusData, ProjectStatus, SortOrder, StatusName,
    resolve_default_status, sort_canonical,
};
pub use template::{TemplateStatus, WorkflowTemplate};
