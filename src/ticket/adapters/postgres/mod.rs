//! `PostgreSQL` adapter for ticket persistence.

mod models;
mod repository;

pub use repository::PostgresTicketRepository;
