//! Error types for ticket domain validation.

use thiserror::Error;

/// Errors returned while constructing ticket domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TicketDomainError {
    /// The title is empty after trimming.
    #[error("ticket title must not be empty")]
    EmptyTitle,

    /// The title exceeds the storage limit.
    #[error("ticket title exceeds 200 character limit")]
    TitleTooLong,

    /// The comment body is empty after trimming.
    #[error("comment body must not be empty")]
    EmptyCommentBody,

    /// The comment body exceeds the storage limit.
    #[error("comment body exceeds 800 character limit")]
    CommentBodyTooLong,

    /// The ticket key is not of the form `<PROJECT>-<n>`.
    #[error("invalid ticket key: {0}")]
    InvalidTicketKey(String),

    /// The ticket type name is not recognised.
    #[error("unknown ticket type: {0}")]
    UnknownTicketType(String),

    /// The priority name is not recognised.
    #[error("unknown ticket priority: {0}")]
    UnknownPriority(String),
}
