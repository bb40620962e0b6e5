//! Domain model for tickets, comments and lifecycle events.

mod comment;
mod error;
mod event;
mod ids;
mod key;
mod ticket;

pub use comment::{Comment, CommentBody, NewComment, PersistedCommentData};
pub use error::TicketDomainError;
pub use event::{TicketEvent, TicketNotification};
pub use ids::{CommentId, TicketId};
pub use key::TicketKey;
pub use ticket::{
    NewTicket, PersistedTicketData, Ticket, TicketChanges, TicketPriority, TicketTitle,
    TicketType,
};
