//! `PostgreSQL` repository implementation for tickets and comments.

use super::models::{CommentRow, NewCommentRow, NewTicketRow, TicketChangeset, TicketRow};
use crate::persistence::postgres::schema::{project_statuses, projects, ticket_comments, tickets};
use crate::persistence::postgres::{
    PgPool, foreign_key_violation, unique_violation, with_connection,
};
use crate::project::domain::{ProjectId, ProjectKey, UserId};
use crate::ticket::{
    domain::{
        Comment, CommentBody, CommentId, NewComment, NewTicket, PersistedCommentData,
        PersistedTicketData, Ticket, TicketId, TicketKey, TicketPriority, TicketTitle,
        TicketType,
    },
    ports::{TicketRepository, TicketRepositoryError, TicketRepositoryResult},
};
use crate::workflow::domain::StatusId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

const TICKET_KEY_INDEX: &str = "idx_tickets_key";
const TICKET_SEQUENCE_INDEX: &str = "idx_tickets_project_sequence";
const TICKET_STATUS_FK: &str = "fk_tickets_status";

/// `PostgreSQL`-backed ticket repository.
#[derive(Debug, Clone)]
pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TicketRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TicketRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        with_connection(&self.pool, f).await
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn create(&self, ticket: &NewTicket) -> TicketRepositoryResult<Ticket> {
        let draft = ticket.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| insert_ticket(tx, &draft))
        })
        .await
    }

    async fn update(&self, ticket: &Ticket) -> TicketRepositoryResult<()> {
        let ticket_id = ticket.id();
        let project_id = ticket.project_id();
        let status_id = ticket.status_id();
        let changes = TicketChangeset {
            title: ticket.title().as_str().to_owned(),
            description: ticket.description().map(str::to_owned),
            ticket_type: ticket.ticket_type().as_str().to_owned(),
            priority: ticket.priority().as_str().to_owned(),
            status_id: status_id.value(),
            assignee_id: ticket.assignee_id().map(UserId::value),
            updated_at: ticket.updated_at(),
        };
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| {
                ensure_status_owned(tx, project_id, status_id)?;
                let updated = diesel::update(tickets::table.filter(tickets::id.eq(ticket_id.value())))
                    .set(&changes)
                    .execute(tx)?;
                if updated == 0 {
                    return Err(TicketRepositoryError::NotFound(ticket_id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn delete(&self, id: TicketId) -> TicketRepositoryResult<bool> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tickets::table.filter(tickets::id.eq(id.value())))
                .execute(connection)?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_by_id(&self, id: TicketId) -> TicketRepositoryResult<Option<Ticket>> {
        self.run_blocking(move |connection| {
            let row = tickets::table
                .filter(tickets::id.eq(id.value()))
                .select(TicketRow::as_select())
                .first::<TicketRow>(connection)
                .optional()?;
            row.map(row_to_ticket).transpose()
        })
        .await
    }

    async fn find_by_key(&self, key: &TicketKey) -> TicketRepositoryResult<Option<Ticket>> {
        let lookup_key = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = tickets::table
                .filter(tickets::key.eq(lookup_key))
                .select(TicketRow::as_select())
                .first::<TicketRow>(connection)
                .optional()?;
            row.map(row_to_ticket).transpose()
        })
        .await
    }

    async fn list_for_project(&self, project_id: ProjectId) -> TicketRepositoryResult<Vec<Ticket>> {
        self.run_blocking(move |connection| {
            let rows = tickets::table
                .filter(tickets::project_id.eq(project_id.value()))
                .order((tickets::created_at.desc(), tickets::id.desc()))
                .select(TicketRow::as_select())
                .load::<TicketRow>(connection)?;
            rows.into_iter().map(row_to_ticket).collect()
        })
        .await
    }

    async fn add_comment(&self, comment: &NewComment) -> TicketRepositoryResult<Comment> {
        let ticket_id = comment.ticket_id();
        let new_row = NewCommentRow {
            ticket_id: ticket_id.value(),
            author_id: comment.author_id().value(),
            body: comment.body().as_str().to_owned(),
            created_at: comment.created_at(),
        };
        self.run_blocking(move |connection| {
            connection.transaction::<_, TicketRepositoryError, _>(|tx| {
                let exists = diesel::select(diesel::dsl::exists(
                    tickets::table.filter(tickets::id.eq(ticket_id.value())),
                ))
                .get_result::<bool>(tx)?;
                if !exists {
                    return Err(TicketRepositoryError::NotFound(ticket_id));
                }
                let row = diesel::insert_into(ticket_comments::table)
                    .values(&new_row)
                    .returning(CommentRow::as_returning())
                    .get_result::<CommentRow>(tx)?;
                row_to_comment(row)
            })
        })
        .await
    }

    async fn list_comments(&self, ticket_id: TicketId) -> TicketRepositoryResult<Vec<Comment>> {
        self.run_blocking(move |connection| {
            let rows = ticket_comments::table
                .filter(ticket_comments::ticket_id.eq(ticket_id.value()))
                .order((ticket_comments::created_at.asc(), ticket_comments::id.asc()))
                .select(CommentRow::as_select())
                .load::<CommentRow>(connection)?;
            rows.into_iter().map(row_to_comment).collect()
        })
        .await
    }
}

fn insert_ticket(
    connection: &mut PgConnection,
    ticket: &NewTicket,
) -> TicketRepositoryResult<Ticket> {
    let project_id = ticket.project_id();
    let stored_key = projects::table
        .filter(projects::id.eq(project_id.value()))
        .select(projects::key)
        .first::<String>(connection)
        .optional()?
        .ok_or(TicketRepositoryError::ProjectNotFound(project_id))?;
    let project_key =
        ProjectKey::new(stored_key).map_err(TicketRepositoryError::invalid_persisted_data)?;
    ensure_status_owned(connection, project_id, ticket.status_id())?;

    let max_sequence = tickets::table
        .filter(tickets::project_id.eq(project_id.value()))
        .select(diesel::dsl::max(tickets::sequence))
        .first::<Option<i64>>(connection)?;
    let next = max_sequence.map_or(1, |max| max.saturating_add(1));
    let sequence = u64::try_from(next).map_err(TicketRepositoryError::invalid_persisted_data)?;
    let key = TicketKey::compose(&project_key, sequence);

    let new_row = NewTicketRow {
        project_id: project_id.value(),
        sequence: next,
        key: key.as_str().to_owned(),
        title: ticket.title().as_str().to_owned(),
        description: ticket.description().map(str::to_owned),
        ticket_type: ticket.ticket_type().as_str().to_owned(),
        priority: ticket.priority().as_str().to_owned(),
        status_id: ticket.status_id().value(),
        reporter_id: ticket.reporter_id().value(),
        assignee_id: ticket.assignee_id().map(UserId::value),
        created_at: ticket.created_at(),
    };
    let row = diesel::insert_into(tickets::table)
        .values(&new_row)
        .returning(TicketRow::as_returning())
        .get_result::<TicketRow>(connection)
        .map_err(|err| {
            let unique = unique_violation(&err);
            if unique == Some(TICKET_KEY_INDEX) || unique == Some(TICKET_SEQUENCE_INDEX) {
                TicketRepositoryError::DuplicateKey(key.clone())
            } else if foreign_key_violation(&err) == Some(TICKET_STATUS_FK) {
                TicketRepositoryError::StatusNotFound {
                    project_id,
                    status_id: ticket.status_id(),
                }
            } else {
                TicketRepositoryError::persistence(err)
            }
        })?;
    row_to_ticket(row)
}

fn ensure_status_owned(
    connection: &mut PgConnection,
    project_id: ProjectId,
    status_id: StatusId,
) -> TicketRepositoryResult<()> {
    let owned = diesel::select(diesel::dsl::exists(
        project_statuses::table
            .filter(project_statuses::id.eq(status_id.value()))
            .filter(project_statuses::project_id.eq(project_id.value())),
    ))
    .get_result::<bool>(connection)?;
    if owned {
        Ok(())
    } else {
        Err(TicketRepositoryError::StatusNotFound {
            project_id,
            status_id,
        })
    }
}

fn row_to_ticket(row: TicketRow) -> TicketRepositoryResult<Ticket> {
    let TicketRow {
        id,
        project_id,
        sequence,
        key,
        title,
        description,
        ticket_type,
        priority,
        status_id,
        reporter_id,
        assignee_id,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTicketData {
        id: TicketId::new(id),
        project_id: ProjectId::new(project_id),
        sequence: u64::try_from(sequence).map_err(TicketRepositoryError::invalid_persisted_data)?,
        key: TicketKey::parse(&key).map_err(TicketRepositoryError::invalid_persisted_data)?,
        title: TicketTitle::new(title).map_err(TicketRepositoryError::invalid_persisted_data)?,
        description,
        ticket_type: TicketType::try_from(ticket_type.as_str())
            .map_err(TicketRepositoryError::invalid_persisted_data)?,
        priority: TicketPriority::try_from(priority.as_str())
            .map_err(TicketRepositoryError::invalid_persisted_data)?,
        status_id: StatusId::new(status_id),
        reporter_id: UserId::new(reporter_id),
        assignee_id: assignee_id.map(UserId::new),
        created_at,
        updated_at,
    };
    Ok(Ticket::from_persisted(data))
}

fn row_to_comment(row: CommentRow) -> TicketRepositoryResult<Comment> {
    Ok(Comment::from_persisted(PersistedCommentData {
        id: CommentId::new(row.id),
        ticket_id: TicketId::new(row.ticket_id),
        author_id: UserId::new(row.author_id),
        body: CommentBody::new(row.body).map_err(TicketRepositoryError::invalid_persisted_data)?,
        created_at: row.created_at,
    }))
}
