//! In-memory ticket adapters for tests and embedding.

mod publisher;
mod repository;

pub use publisher::InMemoryTicketEventPublisher;
pub use repository::InMemoryTicketRepository;
