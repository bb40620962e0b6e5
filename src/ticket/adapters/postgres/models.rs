//! Diesel row models for tickets and comments.

use crate::persistence::postgres::schema::{ticket_comments, tickets};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for ticket records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tickets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TicketRow {
    /// Internal ticket identifier.
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Per-project sequence number.
    pub sequence: i64,
    /// Ticket key.
    pub key: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Ticket type name.
    pub ticket_type: String,
    /// Priority name.
    pub priority: String,
    /// Current status.
    pub status_id: i64,
    /// Reporter.
    pub reporter_id: i64,
    /// Assignee.
    pub assignee_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert model for ticket records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tickets)]
pub struct NewTicketRow {
    /// Owning project.
    pub project_id: i64,
    /// Per-project sequence number.
    pub sequence: i64,
    /// Ticket key.
    pub key: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Ticket type name.
    pub ticket_type: String,
    /// Priority name.
    pub priority: String,
    /// Initial status.
    pub status_id: i64,
    /// Reporter.
    pub reporter_id: i64,
    /// Assignee.
    pub assignee_id: Option<i64>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Changeset applied by ticket updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tickets)]
#[diesel(treat_none_as_null = true)]
pub struct TicketChangeset {
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Ticket type name.
    pub ticket_type: String,
    /// Priority name.
    pub priority: String,
    /// Current status.
    pub status_id: i64,
    /// Assignee.
    pub assignee_id: Option<i64>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Query result row for comment records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ticket_comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    /// Internal comment identifier.
    pub id: i64,
    /// Commented ticket.
    pub ticket_id: i64,
    /// Author.
    pub author_id: i64,
    /// Body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for comment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ticket_comments)]
pub struct NewCommentRow {
    /// Commented ticket.
    pub ticket_id: i64,
    /// Author.
    pub author_id: i64,
    /// Body.
    pub body: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
