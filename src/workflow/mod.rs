//! Workflow statuses and per-user Kanban columns for Taskflow.
//!
//! Two stores live here. The status registry owns a project's ordered list of
//! workflow statuses together with its naming, ordering and deletion-safety
//! rules. The column preference store keeps, per user and project, a
//! position/visibility row for every current status and reconciles those rows
//! whenever the status set or the user's layout changes. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
