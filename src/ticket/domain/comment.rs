//! Ticket comments.

use super::{CommentId, TicketDomainError, TicketId};
use crate::project::domain::UserId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

const MAX_BODY_LENGTH: usize = 800;

/// Non-blank comment text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentBody(String);

impl CommentBody {
    /// Creates a validated comment body. Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyCommentBody`] for a blank value or
    /// [`TicketDomainError::CommentBodyTooLong`] above 800 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TicketDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TicketDomainError::EmptyCommentBody);
        }
        if trimmed.chars().count() > MAX_BODY_LENGTH {
            return Err(TicketDomainError::CommentBodyTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the body as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A comment that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    ticket_id: TicketId,
    author_id: UserId,
    body: CommentBody,
    created_at: DateTime<Utc>,
}

impl NewComment {
    /// Prepares a comment by `author_id` on `ticket_id`.
    #[must_use]
    pub fn new(
        ticket_id: TicketId,
        author_id: UserId,
        body: CommentBody,
        clock: &impl Clock,
    ) -> Self {
        Self {
            ticket_id,
            author_id,
            body,
            created_at: clock.utc(),
        }
    }

    /// Returns the commented ticket.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &CommentBody {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attaches the identifier assigned by storage.
    #[must_use]
    pub fn into_comment(self, id: CommentId) -> Comment {
        Comment {
            id,
            ticket_id: self.ticket_id,
            author_id: self.author_id,
            body: self.body,
            created_at: self.created_at,
        }
    }
}

/// Parameter object for reconstructing a persisted comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedCommentData {
    /// Persisted identifier.
    pub id: CommentId,
    /// Commented ticket.
    pub ticket_id: TicketId,
    /// Author.
    pub author_id: UserId,
    /// Body.
    pub body: CommentBody,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A comment on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    ticket_id: TicketId,
    author_id: UserId,
    body: CommentBody,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Reconstructs a comment from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedCommentData) -> Self {
        Self {
            id: data.id,
            ticket_id: data.ticket_id,
            author_id: data.author_id,
            body: data.body,
            created_at: data.created_at,
        }
    }

    /// Returns the comment identifier.
    #[must_use]
    pub const fn id(&self) -> CommentId {
        self.id
    }

    /// Returns the commented ticket.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// Returns the author.
    #[must_use]
    pub const fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Returns the body.
    #[must_use]
    pub const fn body(&self) -> &CommentBody {
        &self.body
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
