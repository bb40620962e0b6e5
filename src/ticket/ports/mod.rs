//! Port contracts for ticket persistence and change notifications.

pub mod publisher;
pub mod repository;

pub use publisher::{TicketEventPublisher, TicketPublishError};
pub use repository::{TicketRepository, TicketRepositoryError, TicketRepositoryResult};

#[cfg(test)]
pub use publisher::MockTicketEventPublisher;
