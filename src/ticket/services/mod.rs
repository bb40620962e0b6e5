//! Application services for the ticket lifecycle.

mod error;
mod lifecycle;

pub use error::{TicketServiceError, TicketServiceResult};
pub use lifecycle::{CreateTicketRequest, TicketLifecycleService};
