//! Lifecycle events announced after ticket changes commit.

use super::{Comment, CommentId, Ticket, TicketId, TicketKey};
use crate::project::domain::{ProjectId, UserId};
use crate::workflow::domain::StatusId;
use serde::Serialize;

/// Something that happened to a ticket.
///
/// Serialises to the bare payload fields; the event kind travels as the
/// routing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TicketEvent {
    /// A ticket was created.
    Created {
        /// Ticket identifier.
        id: TicketId,
        /// Ticket key.
        key: TicketKey,
        /// Ticket title.
        title: String,
        /// Owning project.
        project_id: ProjectId,
        /// Reporter.
        reporter_id: UserId,
        /// Assignee.
        assignee_id: Option<UserId>,
    },
    /// A ticket changed.
    Updated {
        /// Ticket identifier.
        id: TicketId,
        /// Ticket key.
        key: TicketKey,
        /// Status after the change.
        status_id: StatusId,
        /// Assignee after the change.
        assignee_id: Option<UserId>,
    },
    /// A ticket was deleted.
    Deleted {
        /// Ticket identifier.
        id: TicketId,
        /// Ticket key.
        key: TicketKey,
    },
    /// A comment was added.
    Commented {
        /// Comment identifier.
        id: CommentId,
        /// Commented ticket.
        ticket_id: TicketId,
        /// Author.
        author_id: UserId,
    },
}

impl TicketEvent {
    /// Event for a newly created ticket.
    #[must_use]
    pub fn created(ticket: &Ticket) -> Self {
        Self::Created {
            id: ticket.id(),
            key: ticket.key().clone(),
            title: ticket.title().as_str().to_owned(),
            project_id: ticket.project_id(),
            reporter_id: ticket.reporter_id(),
            assignee_id: ticket.assignee_id(),
        }
    }

    /// Event for an updated ticket.
    #[must_use]
    pub fn updated(ticket: &Ticket) -> Self {
        Self::Updated {
            id: ticket.id(),
            key: ticket.key().clone(),
            status_id: ticket.status_id(),
            assignee_id: ticket.assignee_id(),
        }
    }

    /// Event for a deleted ticket.
    #[must_use]
    pub fn deleted(ticket: &Ticket) -> Self {
        Self::Deleted {
            id: ticket.id(),
            key: ticket.key().clone(),
        }
    }

    /// Event for a new comment.
    #[must_use]
    pub const fn commented(comment: &Comment) -> Self {
        Self::Commented {
            id: comment.id(),
            ticket_id: comment.ticket_id(),
            author_id: comment.author_id(),
        }
    }

    /// Returns the routing key naming the event kind.
    #[must_use]
    pub const fn routing_key(&self) -> &'static str {
        match self {
            Self::Created { .. } => "ticket.created",
            Self::Updated { .. } => "ticket.updated",
            Self::Deleted { .. } => "ticket.deleted",
            Self::Commented { .. } => "ticket.commented",
        }
    }

    /// Serialises the event into a message for `exchange`.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the payload cannot be encoded.
    pub fn to_notification(
        &self,
        exchange: &str,
    ) -> Result<TicketNotification, serde_json::Error> {
        Ok(TicketNotification {
            exchange: exchange.to_owned(),
            routing_key: self.routing_key().to_owned(),
            payload: serde_json::to_string(self)?,
        })
    }
}

/// Encoded event ready for the message broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketNotification {
    /// Exchange the message is published to.
    pub exchange: String,
    /// Routing key naming the event kind.
    pub routing_key: String,
    /// JSON payload.
    pub payload: String,
}
