//! Step definitions for Kanban column scenarios.

pub mod world;

mod given;
mod then;
mod when;
