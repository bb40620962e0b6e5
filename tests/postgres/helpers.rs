//! Shared wiring for `PostgreSQL` integration tests.

use std::num::NonZeroU32;
use std::sync::Arc;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::TestCluster;
use taskflow::persistence::{PgPool, build_pool};
use taskflow::project::{
    adapters::postgres::PostgresProjectRepository,
    domain::{NewProject, Project, ProjectKey, ProjectName},
    ports::ProjectRepository,
};
use taskflow::ticket::{
    adapters::{logging::TracingTicketEventPublisher, postgres::PostgresTicketRepository},
    services::TicketLifecycleService,
};
use taskflow::user::{
    adapters::postgres::PostgresUserRepository,
    domain::{DisplayName, Email, NewUser, User},
    ports::UserRepository,
};
use taskflow::workflow::{
    adapters::postgres::PostgresWorkflowRepository,
    domain::WorkflowTemplate,
    services::{ColumnPreferenceService, StatusRegistryService},
};
use tokio::runtime::Runtime;
use tracing::warn;

/// Template database holding the migrated tracker schema.
pub const TEMPLATE_DB: &str = "taskflow_test_template";

const TRACKER_SCHEMA: &str =
    include_str!("../../migrations/2026-02-03-000000_create_tracker_tables/up.sql");

/// Ticket service wired to `PostgreSQL` with a logging publisher.
pub type Tickets = TicketLifecycleService<
    PostgresTicketRepository,
    PostgresWorkflowRepository,
    TracingTicketEventPublisher,
    DefaultClock,
>;

/// Creates a runtime for driving async repositories from sync tests.
///
/// # Errors
///
/// Returns an error when the runtime cannot be built.
pub fn test_runtime() -> Result<Runtime, eyre::Report> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()?)
}

/// Ensures the template database exists with the tracker schema applied.
///
/// # Errors
///
/// Returns an error when the template cannot be created or migrated.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), eyre::Report> {
    cluster.ensure_template_exists(TEMPLATE_DB, |db_name| {
        let url = cluster.connection().database_url(db_name);
        let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
        conn.batch_execute(TRACKER_SCHEMA)
            .map_err(|e| eyre::eyre!("schema error: {e}"))?;
        Ok(())
    })?;
    Ok(())
}

/// Drops the test database when the test ends, even on panic.
struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            warn!(db_name = %self.db_name, error = %err, "failed to drop test database");
        }
    }
}

/// Repositories over one freshly cloned database.
///
/// Fields drop in declaration order, so every pool handle is released
/// before the guard drops the database.
pub struct TrackerDb {
    pool: PgPool,
    /// User directory.
    pub users: PostgresUserRepository,
    /// Project registry.
    pub projects: PostgresProjectRepository,
    /// Workflow transactions.
    pub workflow: Arc<PostgresWorkflowRepository>,
    /// Ticket storage.
    pub tickets: Arc<PostgresTicketRepository>,
    _guard: CleanupGuard,
}

impl TrackerDb {
    /// Clones the template into a database named after `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error when the template, the clone or the pool cannot be
    /// prepared.
    pub fn create(
        cluster: &'static TestCluster,
        prefix: &str,
        max_connections: u32,
    ) -> Result<Self, eyre::Report> {
        ensure_template(cluster)?;
        let db_name = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
        cluster.create_database_from_template(db_name.as_str(), TEMPLATE_DB)?;
        let guard = CleanupGuard {
            cluster,
            db_name: db_name.clone(),
        };
        let url = cluster.connection().database_url(&db_name);
        let size = NonZeroU32::new(max_connections)
            .ok_or_else(|| eyre::eyre!("pool needs at least one connection"))?;
        let pool = build_pool(&url, size)?;
        Ok(Self {
            users: PostgresUserRepository::new(pool.clone()),
            projects: PostgresProjectRepository::new(pool.clone()),
            workflow: Arc::new(PostgresWorkflowRepository::new(pool.clone())),
            tickets: Arc::new(PostgresTicketRepository::new(pool.clone())),
            pool,
            _guard: guard,
        })
    }

    /// Returns a status registry over this database.
    #[must_use]
    pub fn registry(&self) -> StatusRegistryService<PostgresWorkflowRepository> {
        StatusRegistryService::new(Arc::clone(&self.workflow))
    }

    /// Returns a column preference service over this database.
    #[must_use]
    pub fn columns(&self) -> ColumnPreferenceService<PostgresWorkflowRepository> {
        ColumnPreferenceService::new(Arc::clone(&self.workflow))
    }

    /// Returns a ticket service over this database.
    #[must_use]
    pub fn ticket_service(&self) -> Tickets {
        TicketLifecycleService::new(
            Arc::clone(&self.tickets),
            Arc::clone(&self.workflow),
            Arc::new(TracingTicketEventPublisher),
            Arc::new(DefaultClock),
        )
    }

    /// Runs a raw query on a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection is available or `query` fails.
    pub async fn query<T, F>(&self, query: F) -> Result<T, eyre::Report>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<T, eyre::Report> {
            let mut connection = pool.get()?;
            Ok(query(&mut connection)?)
        })
        .await?
    }

    /// Registers a user named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the user cannot be stored.
    pub async fn user(&self, name: &str) -> Result<User, eyre::Report> {
        let draft = NewUser::new(
            Email::new(format!("{}@example.test", name.to_lowercase()))?,
            DisplayName::new(name)?,
            &DefaultClock,
        );
        Ok(self.users.create(&draft).await?)
    }

    /// Creates a project seeded from `template`.
    ///
    /// # Errors
    ///
    /// Returns an error when the project cannot be stored.
    pub async fn project(
        &self,
        key: &str,
        template: &WorkflowTemplate,
    ) -> Result<Project, eyre::Report> {
        let draft = NewProject::new(
            ProjectKey::new(key)?,
            ProjectName::new(format!("{key} project"))?,
            None,
            &DefaultClock,
        )?;
        Ok(self.projects.create(&draft, template).await?)
    }
}
