//! Repository port for tickets and comments.

use crate::project::domain::ProjectId;
use crate::ticket::domain::{Comment, NewComment, NewTicket, Ticket, TicketId, TicketKey};
use crate::workflow::domain::StatusId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ticket repository operations.
pub type TicketRepositoryResult<T> = Result<T, TicketRepositoryError>;

/// Ticket persistence contract.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Stores a new ticket and allocates its key.
    ///
    /// In one transaction the project key is read, the next sequence number
    /// is taken as the project's highest sequence plus one, and the ticket is
    /// inserted as `<PROJECT KEY>-<sequence>`.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::DuplicateKey`] when a concurrent
    /// creation claimed the same sequence,
    /// [`TicketRepositoryError::ProjectNotFound`] for an unknown project and
    /// [`TicketRepositoryError::StatusNotFound`] when the status does not
    /// belong to the project.
    async fn create(&self, ticket: &NewTicket) -> TicketRepositoryResult<Ticket>;

    /// Persists changes to an existing ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::NotFound`] when the ticket is gone and
    /// [`TicketRepositoryError::StatusNotFound`] when its status does not
    /// belong to its project.
    async fn update(&self, ticket: &Ticket) -> TicketRepositoryResult<()>;

    /// Deletes a ticket with its comments.
    ///
    /// Returns `false` when the ticket does not exist.
    async fn delete(&self, id: TicketId) -> TicketRepositoryResult<bool>;

    /// Finds a ticket by identifier.
    async fn find_by_id(&self, id: TicketId) -> TicketRepositoryResult<Option<Ticket>>;

    /// Finds a ticket by key.
    async fn find_by_key(&self, key: &TicketKey) -> TicketRepositoryResult<Option<Ticket>>;

    /// Returns a project's tickets, newest first.
    async fn list_for_project(&self, project_id: ProjectId) -> TicketRepositoryResult<Vec<Ticket>>;

    /// Stores a comment.
    ///
    /// # Errors
    ///
    /// Returns [`TicketRepositoryError::NotFound`] when the ticket is gone.
    async fn add_comment(&self, comment: &NewComment) -> TicketRepositoryResult<Comment>;

    /// Returns a ticket's comments, oldest first.
    async fn list_comments(&self, ticket_id: TicketId) -> TicketRepositoryResult<Vec<Comment>>;
}

/// Errors returned by ticket repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TicketRepositoryError {
    /// Another ticket already holds the key.
    #[error("duplicate ticket key: {0}")]
    DuplicateKey(TicketKey),

    /// The ticket was not found.
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The status does not belong to the ticket's project.
    #[error("status {status_id} not found in project {project_id}")]
    StatusNotFound {
        /// Project the ticket belongs to.
        project_id: ProjectId,
        /// Rejected status.
        status_id: StatusId,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TicketRepositoryError {
    /// Wraps a data-quality error from persisted rows.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

impl From<crate::persistence::MemoryLockError> for TicketRepositoryError {
    fn from(err: crate::persistence::MemoryLockError) -> Self {
        Self::persistence(err)
    }
}

impl From<crate::persistence::PoolAccessError> for TicketRepositoryError {
    fn from(err: crate::persistence::PoolAccessError) -> Self {
        Self::persistence(err)
    }
}

impl From<diesel::result::Error> for TicketRepositoryError {
    fn from(err: diesel::result::Error) -> Self {
        Self::persistence(err)
    }
}
