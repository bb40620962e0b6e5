//! Ticket aggregate and its value types.

use super::{TicketDomainError, TicketId, TicketKey};
use crate::project::domain::{ProjectId, UserId};
use crate::workflow::domain::StatusId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_TITLE_LENGTH: usize = 200;

/// Trimmed, non-empty ticket title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketTitle(String);

impl TicketTitle {
    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::EmptyTitle`] for a blank value or
    /// [`TicketDomainError::TitleTooLong`] above 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TicketDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TicketDomainError::EmptyTitle);
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(TicketDomainError::TitleTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of work a ticket tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    /// General work item.
    #[default]
    Task,
    /// Defect report.
    Bug,
    /// New capability.
    Feature,
}

impl TicketType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Bug => "bug",
            Self::Feature => "feature",
        }
    }
}

impl TryFrom<&str> for TicketType {
    type Error = TicketDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "task" => Ok(Self::Task),
            "bug" => Ok(Self::Bug),
            "feature" => Ok(Self::Feature),
            _ => Err(TicketDomainError::UnknownTicketType(value.to_owned())),
        }
    }
}

/// Urgency of a ticket.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    /// Can wait.
    Low,
    /// Normal urgency.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Blocks other work.
    Critical,
}

impl TicketPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl TryFrom<&str> for TicketPriority {
    type Error = TicketDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(TicketDomainError::UnknownPriority(value.to_owned())),
        }
    }
}

/// A ticket that has not been persisted yet.
///
/// Storage assigns the identifier, the per-project sequence and the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    project_id: ProjectId,
    title: TicketTitle,
    description: Option<String>,
    ticket_type: TicketType,
    priority: TicketPriority,
    status_id: StatusId,
    reporter_id: UserId,
    assignee_id: Option<UserId>,
    created_at: DateTime<Utc>,
}

impl NewTicket {
    /// Prepares a ticket in `status_id`, reported by `reporter_id`.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        title: TicketTitle,
        status_id: StatusId,
        reporter_id: UserId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            project_id,
            title,
            description: None,
            ticket_type: TicketType::default(),
            priority: TicketPriority::default(),
            status_id,
            reporter_id,
            assignee_id: None,
            created_at: clock.utc(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets the ticket type.
    #[must_use]
    pub const fn with_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_type = ticket_type;
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: Option<UserId>) -> Self {
        self.assignee_id = assignee_id;
        self
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TicketTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the ticket type.
    #[must_use]
    pub const fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TicketPriority {
        self.priority
    }

    /// Returns the initial status.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns the reporter.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attaches the identity assigned by storage.
    #[must_use]
    pub fn into_ticket(self, id: TicketId, sequence: u64, key: TicketKey) -> Ticket {
        Ticket {
            id,
            project_id: self.project_id,
            sequence,
            key,
            title: self.title,
            description: self.description,
            ticket_type: self.ticket_type,
            priority: self.priority,
            status_id: self.status_id,
            reporter_id: self.reporter_id,
            assignee_id: self.assignee_id,
            created_at: self.created_at,
            updated_at: None,
        }
    }
}

/// Partial update of a ticket. Unset fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketChanges {
    title: Option<String>,
    description: Option<Option<String>>,
    ticket_type: Option<TicketType>,
    priority: Option<TicketPriority>,
    status_id: Option<StatusId>,
    assignee_id: Option<Option<UserId>>,
}

impl TicketChanges {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Some(description.into()));
        self
    }

    /// Removes the description.
    #[must_use]
    pub fn clear_description(mut self) -> Self {
        self.description = Some(None);
        self
    }

    /// Replaces the ticket type.
    #[must_use]
    pub const fn with_type(mut self, ticket_type: TicketType) -> Self {
        self.ticket_type = Some(ticket_type);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TicketPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Moves the ticket to another status of its project.
    #[must_use]
    pub const fn with_status(mut self, status_id: StatusId) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Assigns the ticket.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(Some(assignee_id));
        self
    }

    /// Unassigns the ticket.
    #[must_use]
    pub const fn clear_assignee(mut self) -> Self {
        self.assignee_id = Some(None);
        self
    }

    /// Returns the requested status change.
    #[must_use]
    pub const fn status_id(&self) -> Option<StatusId> {
        self.status_id
    }
}

/// Parameter object for reconstructing a persisted ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTicketData {
    /// Persisted identifier.
    pub id: TicketId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Per-project sequence number.
    pub sequence: u64,
    /// Ticket key.
    pub key: TicketKey,
    /// Title.
    pub title: TicketTitle,
    /// Description.
    pub description: Option<String>,
    /// Ticket type.
    pub ticket_type: TicketType,
    /// Priority.
    pub priority: TicketPriority,
    /// Current status.
    pub status_id: StatusId,
    /// Reporter.
    pub reporter_id: UserId,
    /// Assignee.
    pub assignee_id: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Ticket aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    id: TicketId,
    project_id: ProjectId,
    sequence: u64,
    key: TicketKey,
    title: TicketTitle,
    description: Option<String>,
    ticket_type: TicketType,
    priority: TicketPriority,
    status_id: StatusId,
    reporter_id: UserId,
    assignee_id: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl Ticket {
    /// Reconstructs a ticket from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTicketData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            sequence: data.sequence,
            key: data.key,
            title: data.title,
            description: data.description,
            ticket_type: data.ticket_type,
            priority: data.priority,
            status_id: data.status_id,
            reporter_id: data.reporter_id,
            assignee_id: data.assignee_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the ticket identifier.
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the per-project sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the ticket key.
    #[must_use]
    pub const fn key(&self) -> &TicketKey {
        &self.key
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TicketTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the ticket type.
    #[must_use]
    pub const fn ticket_type(&self) -> TicketType {
        self.ticket_type
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TicketPriority {
        self.priority
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.status_id
    }

    /// Returns the reporter.
    #[must_use]
    pub const fn reporter_id(&self) -> UserId {
        self.reporter_id
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Applies a change set and stamps the update time.
    ///
    /// Status ownership is not checked here; storage rejects a status from
    /// another project.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError`] when the new title is invalid. The
    /// ticket is left unchanged in that case.
    pub fn apply(
        &mut self,
        changes: TicketChanges,
        clock: &impl Clock,
    ) -> Result<(), TicketDomainError> {
        let title = changes.title.map(TicketTitle::new).transpose()?;
        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(ticket_type) = changes.ticket_type {
            self.ticket_type = ticket_type;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if let Some(status_id) = changes.status_id {
            self.status_id = status_id;
        }
        if let Some(assignee_id) = changes.assignee_id {
            self.assignee_id = assignee_id;
        }
        self.updated_at = Some(clock.utc());
        Ok(())
    }
}
