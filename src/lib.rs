//! Taskflow: project and ticket tracking core.
//!
//! This crate provides the domain core of a project/ticket tracker: per-project
//! workflow statuses, per-user Kanban column preferences, ticket lifecycle with
//! key allocation, and the access-gated board facade that callers use.
//!
//! # Architecture
//!
//! Taskflow follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`user`]: User directory behind memberships and caller identities
//! - [`project`]: Projects, membership and the project access gate
//! - [`workflow`]: Status registry and Kanban column preferences
//! - [`ticket`]: Ticket lifecycle, comments and change notifications
//! - [`board`]: Access-checked entry points returning view models
//! - [`persistence`]: Shared in-memory database and `PostgreSQL` plumbing

pub mod board;
pub mod config;
pub mod error;
pub mod persistence;
pub mod project;
pub mod telemetry;
pub mod ticket;
pub mod user;
pub mod workflow;
