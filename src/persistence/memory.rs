//! In-memory relational store backing every in-memory adapter.

use crate::project::domain::{Project, ProjectId, UserId};
use crate::ticket::domain::{Comment, CommentId, Ticket, TicketId};
use crate::user::domain::User;
use crate::workflow::domain::{ColumnPreference, ColumnPreferenceId, ProjectStatus, StatusId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// The store's lock was poisoned by a panicking writer.
#[derive(Debug, Clone, Error)]
#[error("in-memory database lock poisoned: {0}")]
pub struct MemoryLockError(String);

/// Thread-safe in-memory database shared by the in-memory repositories.
///
/// Clones share state. Writes go through [`InMemoryDatabase::transaction`],
/// which applies a closure to a private copy of every table and publishes the
/// copy only when the closure succeeds.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    state: Arc<RwLock<Tables>>,
}

/// Rows held by the in-memory database.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    last_id: i64,
    pub(crate) users: BTreeMap<UserId, User>,
    pub(crate) projects: BTreeMap<ProjectId, Project>,
    pub(crate) members: BTreeSet<(ProjectId, UserId)>,
    pub(crate) statuses: BTreeMap<StatusId, ProjectStatus>,
    pub(crate) column_preferences: BTreeMap<ColumnPreferenceId, ColumnPreference>,
    pub(crate) tickets: BTreeMap<TicketId, Ticket>,
    pub(crate) comments: BTreeMap<CommentId, Comment>,
}

impl Tables {
    /// Returns the next value of the shared identity sequence.
    pub(crate) const fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Removes a project with its memberships, statuses, preferences, tickets
    /// and comments.
    pub(crate) fn remove_project(&mut self, project_id: ProjectId) -> bool {
        if self.projects.remove(&project_id).is_none() {
            return false;
        }
        self.members.retain(|(project, _)| *project != project_id);
        let tickets: Vec<TicketId> = self
            .tickets
            .values()
            .filter(|ticket| ticket.project_id() == project_id)
            .map(Ticket::id)
            .collect();
        for ticket_id in tickets {
            self.remove_ticket(ticket_id);
        }
        let statuses: Vec<StatusId> = self
            .statuses
            .values()
            .filter(|status| status.project_id() == project_id)
            .map(ProjectStatus::id)
            .collect();
        for status_id in statuses {
            self.remove_status(status_id);
        }
        true
    }

    /// Removes a status and the column preferences that show it.
    pub(crate) fn remove_status(&mut self, status_id: StatusId) -> bool {
        if self.statuses.remove(&status_id).is_none() {
            return false;
        }
        self.column_preferences
            .retain(|_, preference| preference.status_id() != status_id);
        true
    }

    /// Removes a ticket and its comments.
    pub(crate) fn remove_ticket(&mut self, ticket_id: TicketId) -> bool {
        if self.tickets.remove(&ticket_id).is_none() {
            return false;
        }
        self.comments
            .retain(|_, comment| comment.ticket_id() != ticket_id);
        true
    }

    /// Returns the statuses of a project in canonical order.
    pub(crate) fn project_statuses(&self, project_id: ProjectId) -> Vec<ProjectStatus> {
        let mut statuses: Vec<ProjectStatus> = self
            .statuses
            .values()
            .filter(|status| status.project_id() == project_id)
            .cloned()
            .collect();
        crate::workflow::domain::sort_canonical(&mut statuses);
        statuses
    }
}

impl InMemoryDatabase {
    /// Creates an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a read-only closure against the current tables.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, MemoryLockError> {
        let tables = self
            .state
            .read()
            .map_err(|err| MemoryLockError(err.to_string()))?;
        Ok(f(&tables))
    }

    /// Runs a closure against a private copy of the tables and publishes the
    /// copy only when the closure returns `Ok`.
    ///
    /// The write lock is held for the whole closure, so transactions are
    /// serialised. The outer error reports a poisoned lock; the inner result
    /// is the closure's own.
    pub(crate) fn transaction<T, E>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, E>,
    ) -> Result<Result<T, E>, MemoryLockError> {
        let mut tables = self
            .state
            .write()
            .map_err(|err| MemoryLockError(err.to_string()))?;
        let mut working = tables.clone();
        let outcome = f(&mut working);
        if outcome.is_ok() {
            *tables = working;
        }
        Ok(outcome)
    }
}
