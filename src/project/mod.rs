//! Project registry and access control for Taskflow.
//!
//! A project is the identity anchor of a workflow: it owns the ordered status
//! list, the tickets, and the membership list that the access gate consults.
//! The module follows hexagonal architecture:
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
