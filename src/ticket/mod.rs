//! Ticket lifecycle for Taskflow.
//!
//! Every ticket belongs to one project and sits in exactly one of that
//! project's workflow statuses. Creation allocates a per-project key such as
//! `DEMO-7` inside a transaction and retries when a concurrent creation takes
//! the same number. Lifecycle changes are announced through a notification
//! port after they commit. The module follows hexagonal architecture:
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
