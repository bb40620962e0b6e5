//! Ticket repository over the shared in-memory database.

use crate::persistence::InMemoryDatabase;
use crate::project::domain::ProjectId;
use crate::ticket::{
    domain::{Comment, CommentId, NewComment, NewTicket, Ticket, TicketId, TicketKey},
    ports::{TicketRepository, TicketRepositoryError, TicketRepositoryResult},
};
use async_trait::async_trait;
use std::cmp::Reverse;

/// Thread-safe in-memory ticket repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketRepository {
    database: InMemoryDatabase,
}

impl InMemoryTicketRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn create(&self, ticket: &NewTicket) -> TicketRepositoryResult<Ticket> {
        let project_id = ticket.project_id();
        let status_id = ticket.status_id();
        self.database.transaction(|tables| {
            let project_key = tables
                .projects
                .get(&project_id)
                .map(|project| project.key().clone())
                .ok_or(TicketRepositoryError::ProjectNotFound(project_id))?;
            let status_owned = tables
                .statuses
                .get(&status_id)
                .is_some_and(|status| status.project_id() == project_id);
            if !status_owned {
                return Err(TicketRepositoryError::StatusNotFound {
                    project_id,
                    status_id,
                });
            }
            let sequence = tables
                .tickets
                .values()
                .filter(|stored| stored.project_id() == project_id)
                .map(Ticket::sequence)
                .max()
                .map_or(1, |max| max.saturating_add(1));
            let key = TicketKey::compose(&project_key, sequence);
            if tables.tickets.values().any(|stored| stored.key() == &key) {
                return Err(TicketRepositoryError::DuplicateKey(key));
            }
            let id = TicketId::new(tables.next_id());
            let created = ticket.clone().into_ticket(id, sequence, key);
            tables.tickets.insert(id, created.clone());
            Ok(created)
        })?
    }

    async fn update(&self, ticket: &Ticket) -> TicketRepositoryResult<()> {
        self.database.transaction(|tables| {
            if !tables.tickets.contains_key(&ticket.id()) {
                return Err(TicketRepositoryError::NotFound(ticket.id()));
            }
            let status_owned = tables
                .statuses
                .get(&ticket.status_id())
                .is_some_and(|status| status.project_id() == ticket.project_id());
            if !status_owned {
                return Err(TicketRepositoryError::StatusNotFound {
                    project_id: ticket.project_id(),
                    status_id: ticket.status_id(),
                });
            }
            tables.tickets.insert(ticket.id(), ticket.clone());
            Ok(())
        })?
    }

    async fn delete(&self, id: TicketId) -> TicketRepositoryResult<bool> {
        self.database
            .transaction(|tables| Ok(tables.remove_ticket(id)))?
    }

    async fn find_by_id(&self, id: TicketId) -> TicketRepositoryResult<Option<Ticket>> {
        Ok(self.database.read(|tables| tables.tickets.get(&id).cloned())?)
    }

    async fn find_by_key(&self, key: &TicketKey) -> TicketRepositoryResult<Option<Ticket>> {
        Ok(self.database.read(|tables| {
            tables
                .tickets
                .values()
                .find(|ticket| ticket.key() == key)
                .cloned()
        })?)
    }

    async fn list_for_project(&self, project_id: ProjectId) -> TicketRepositoryResult<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self.database.read(|tables| {
            tables
                .tickets
                .values()
                .filter(|ticket| ticket.project_id() == project_id)
                .cloned()
                .collect()
        })?;
        tickets.sort_by_key(|ticket| (Reverse(ticket.created_at()), Reverse(ticket.id())));
        Ok(tickets)
    }

    async fn add_comment(&self, comment: &NewComment) -> TicketRepositoryResult<Comment> {
        self.database.transaction(|tables| {
            if !tables.tickets.contains_key(&comment.ticket_id()) {
                return Err(TicketRepositoryError::NotFound(comment.ticket_id()));
            }
            let id = CommentId::new(tables.next_id());
            let created = comment.clone().into_comment(id);
            tables.comments.insert(id, created.clone());
            Ok(created)
        })?
    }

    async fn list_comments(&self, ticket_id: TicketId) -> TicketRepositoryResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self.database.read(|tables| {
            tables
                .comments
                .values()
                .filter(|comment| comment.ticket_id() == ticket_id)
                .cloned()
                .collect()
        })?;
        comments.sort_by_key(|comment| (comment.created_at(), comment.id()));
        Ok(comments)
    }
}
