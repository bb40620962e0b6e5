//! Caller-facing Kanban board facade.
//!
//! Every operation first asks the [`AccessGate`](crate::project::ports::AccessGate)
//! whether the caller may reach the project, then dispatches to the workflow
//! services and maps the result to view models.

mod error;
mod service;
mod views;

pub use error::{BoardError, BoardResult};
pub use service::KanbanBoardService;
pub use views::{KanbanColumnView, StatusView, UNKNOWN_STATUS_NAME};

#[cfg(test)]
mod tests;
