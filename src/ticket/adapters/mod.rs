//! Adapter implementations for ticket persistence and notifications.

pub mod logging;
pub mod memory;
pub mod postgres;
