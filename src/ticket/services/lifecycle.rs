//! Ticket lifecycle: creation with key allocation, edits, comments and
//! change notifications.

use super::{TicketServiceError, TicketServiceResult};
use crate::config::TrackerConfig;
use crate::project::domain::{ProjectId, UserId};
use crate::ticket::{
    domain::{
        Comment, CommentBody, NewComment, NewTicket, Ticket, TicketChanges, TicketEvent, TicketId,
        TicketKey, TicketPriority, TicketTitle, TicketType,
    },
    ports::{TicketEventPublisher, TicketRepository, TicketRepositoryError},
};
use crate::workflow::{
    domain::StatusId,
    ports::WorkflowRepository,
    services::{StatusRegistryService, WorkflowServiceError},
};
use mockable::Clock;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_EXCHANGE: &str = "taskflow.tickets";
const DEFAULT_KEY_ALLOCATION_ATTEMPTS: NonZeroU32 = match NonZeroU32::new(5) {
    Some(attempts) => attempts,
    None => NonZeroU32::MIN,
};

/// Request payload for creating a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTicketRequest {
    project_id: ProjectId,
    reporter_id: UserId,
    title: String,
    description: Option<String>,
    ticket_type: TicketType,
    priority: TicketPriority,
    assignee_id: Option<UserId>,
    status_id: Option<StatusId>,
}

impl CreateTicketRequest {
    /// Creates a request with the required fields. The ticket lands in the
    /// project's default status unless [`Self::with_status`] is used.
    #[must_use]
    pub fn new(project_id: ProjectId, reporter_id: UserId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            reporter_id,
            title: title.into(),
            description: None,
            ticket_type: TicketType::default(),
            priority: TicketPriority::default(),
            assignee_id: None,
            status_id: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
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

    /// Assigns the ticket.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Places the ticket in an explicit status of its project.
    #[must_use]
    pub const fn with_status(mut self, status_id: StatusId) -> Self {
        self.status_id = Some(status_id);
        self
    }
}

/// Orchestrates ticket persistence and notifications.
#[derive(Clone)]
pub struct TicketLifecycleService<T, W, N, C>
where
    T: TicketRepository,
    W: WorkflowRepository,
    N: TicketEventPublisher,
    C: Clock + Send + Sync,
{
    tickets: Arc<T>,
    statuses: StatusRegistryService<W>,
    publisher: Arc<N>,
    clock: Arc<C>,
    exchange: String,
    key_allocation_attempts: NonZeroU32,
}

impl<T, W, N, C> TicketLifecycleService<T, W, N, C>
where
    T: TicketRepository,
    W: WorkflowRepository,
    N: TicketEventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a ticket service publishing to `taskflow.tickets` with five
    /// key allocation attempts.
    #[must_use]
    pub fn new(tickets: Arc<T>, workflow: Arc<W>, publisher: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            tickets,
            statuses: StatusRegistryService::new(workflow),
            publisher,
            clock,
            exchange: DEFAULT_EXCHANGE.to_owned(),
            key_allocation_attempts: DEFAULT_KEY_ALLOCATION_ATTEMPTS,
        }
    }

    /// Overrides the notification exchange.
    #[must_use]
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    /// Overrides how many times creation retries after a key conflict.
    #[must_use]
    pub const fn with_key_allocation_attempts(mut self, attempts: NonZeroU32) -> Self {
        self.key_allocation_attempts = attempts;
        self
    }

    /// Applies exchange and retry settings from configuration.
    #[must_use]
    pub fn with_config(self, config: &TrackerConfig) -> Self {
        self.with_exchange(config.ticket_exchange.as_str())
            .with_key_allocation_attempts(config.key_allocation_attempts)
    }

    /// Creates a ticket and allocates its `<PROJECT KEY>-<n>` key.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Domain`] for an invalid title,
    /// [`TicketServiceError::Workflow`] when no default status can be
    /// resolved, [`TicketServiceError::StatusNotFound`] when the requested
    /// status belongs to another project and
    /// [`TicketServiceError::KeyAllocationExhausted`] when every attempt hit
    /// a concurrent key.
    pub async fn create_ticket(&self, request: CreateTicketRequest) -> TicketServiceResult<Ticket> {
        let title = TicketTitle::new(request.title)?;
        let status_id = self
            .initial_status(request.project_id, request.status_id)
            .await?;
        let draft = NewTicket::new(
            request.project_id,
            title,
            status_id,
            request.reporter_id,
            &*self.clock,
        )
        .with_description(request.description)
        .with_type(request.ticket_type)
        .with_priority(request.priority)
        .with_assignee(request.assignee_id);

        let ticket = self.insert_with_retry(&draft).await?;
        info!(
            ticket_id = %ticket.id(),
            key = %ticket.key(),
            project_id = %ticket.project_id(),
            "created ticket"
        );
        self.notify(&TicketEvent::created(&ticket)).await;
        Ok(ticket)
    }

    /// Finds a ticket by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Repository`] when the lookup fails.
    pub async fn get_ticket(&self, id: TicketId) -> TicketServiceResult<Option<Ticket>> {
        Ok(self.tickets.find_by_id(id).await?)
    }

    /// Finds a ticket by key such as `DEMO-1`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Domain`] for a malformed key.
    pub async fn get_ticket_by_key(&self, key: &str) -> TicketServiceResult<Option<Ticket>> {
        let ticket_key = TicketKey::parse(key)?;
        Ok(self.tickets.find_by_key(&ticket_key).await?)
    }

    /// Returns a project's tickets, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Repository`] when the lookup fails.
    pub async fn list_tickets(&self, project_id: ProjectId) -> TicketServiceResult<Vec<Ticket>> {
        let tickets = self.tickets.list_for_project(project_id).await?;
        debug!(%project_id, count = tickets.len(), "listed tickets");
        Ok(tickets)
    }

    /// Applies a partial update and stamps the update time.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::NotFound`] for an unknown ticket,
    /// [`TicketServiceError::Domain`] for an invalid title and
    /// [`TicketServiceError::StatusNotFound`] when the new status belongs to
    /// another project.
    pub async fn update_ticket(
        &self,
        id: TicketId,
        changes: TicketChanges,
    ) -> TicketServiceResult<Ticket> {
        let mut ticket = self.require_ticket(id).await?;
        ticket.apply(changes, &*self.clock)?;
        self.tickets.update(&ticket).await?;
        info!(ticket_id = %id, key = %ticket.key(), status_id = %ticket.status_id(), "updated ticket");
        self.notify(&TicketEvent::updated(&ticket)).await;
        Ok(ticket)
    }

    /// Deletes a ticket and its comments.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::NotFound`] for an unknown ticket.
    pub async fn delete_ticket(&self, id: TicketId) -> TicketServiceResult<()> {
        let ticket = self.require_ticket(id).await?;
        if !self.tickets.delete(id).await? {
            return Err(TicketServiceError::NotFound(id));
        }
        info!(ticket_id = %id, key = %ticket.key(), "deleted ticket");
        self.notify(&TicketEvent::deleted(&ticket)).await;
        Ok(())
    }

    /// Adds a comment to a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::Domain`] for a blank or oversized body
    /// and [`TicketServiceError::NotFound`] for an unknown ticket.
    pub async fn add_comment(
        &self,
        ticket_id: TicketId,
        author_id: UserId,
        body: impl Into<String> + Send,
    ) -> TicketServiceResult<Comment> {
        let comment_body = CommentBody::new(body)?;
        let draft = NewComment::new(ticket_id, author_id, comment_body, &*self.clock);
        let comment = self.tickets.add_comment(&draft).await?;
        info!(%ticket_id, comment_id = %comment.id(), "added comment");
        self.notify(&TicketEvent::commented(&comment)).await;
        Ok(comment)
    }

    /// Returns a ticket's comments, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`TicketServiceError::NotFound`] for an unknown ticket.
    pub async fn list_comments(&self, ticket_id: TicketId) -> TicketServiceResult<Vec<Comment>> {
        self.require_ticket(ticket_id).await?;
        Ok(self.tickets.list_comments(ticket_id).await?)
    }

    async fn initial_status(
        &self,
        project_id: ProjectId,
        requested: Option<StatusId>,
    ) -> TicketServiceResult<StatusId> {
        let Some(status_id) = requested else {
            return match self.statuses.resolve_default_status_id(project_id).await {
                Ok(status_id) => Ok(status_id),
                Err(WorkflowServiceError::ProjectNotFound(id)) => {
                    Err(TicketServiceError::ProjectNotFound(id))
                }
                Err(err) => Err(err.into()),
            };
        };
        Ok(status_id)
    }

    async fn require_ticket(&self, id: TicketId) -> TicketServiceResult<Ticket> {
        self.tickets
            .find_by_id(id)
            .await?
            .ok_or(TicketServiceError::NotFound(id))
    }

    async fn insert_with_retry(&self, draft: &NewTicket) -> TicketServiceResult<Ticket> {
        let attempts = self.key_allocation_attempts.get();
        for attempt in 1..=attempts {
            match self.tickets.create(draft).await {
                Ok(ticket) => return Ok(ticket),
                Err(TicketRepositoryError::DuplicateKey(key)) => {
                    warn!(
                        project_id = %draft.project_id(),
                        %key,
                        attempt,
                        attempts,
                        "ticket key already taken, retrying"
                    );
                }
                Err(other) => return Err(other.into()),
            }
        }
        Err(TicketServiceError::KeyAllocationExhausted {
            project_id: draft.project_id(),
            attempts,
        })
    }

    async fn notify(&self, event: &TicketEvent) {
        let notification = match event.to_notification(&self.exchange) {
            Ok(notification) => notification,
            Err(err) => {
                warn!(routing_key = event.routing_key(), error = %err, "failed to encode ticket event");
                return;
            }
        };
        if let Err(err) = self.publisher.publish(&notification).await {
            warn!(
                exchange = %notification.exchange,
                routing_key = %notification.routing_key,
                error = %err,
                "failed to publish ticket event"
            );
        }
    }
}
