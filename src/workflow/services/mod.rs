//! Application services for the status registry and column preferences.

mod columns;
mod error;
mod registry;

pub use columns::ColumnPreferenceService;
pub use error::{WorkflowServiceError, WorkflowServiceResult};
pub use registry::StatusRegistryService;
