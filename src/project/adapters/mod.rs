//! Adapter implementations for project persistence and access control.

pub mod memory;
pub mod postgres;
