//! Prepares a `PostgreSQL` database for local use.
//!
//! Usage:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/taskflow taskflow_seed
//! ```
//!
//! Applies the tracker schema and, when no project exists yet, seeds an
//! administrator account, the `DEMO` project with the standard workflow and
//! a first ticket `DEMO-1`. Running it again leaves existing data alone.

use mockable::DefaultClock;
use std::sync::Arc;
use taskflow::config::TrackerConfig;
use taskflow::persistence::{apply_schema, build_pool};
use taskflow::project::adapters::postgres::PostgresProjectRepository;
use taskflow::project::domain::UserId;
use taskflow::project::services::{CreateProjectRequest, ProjectService};
use taskflow::telemetry;
use taskflow::ticket::adapters::logging::TracingTicketEventPublisher;
use taskflow::ticket::adapters::postgres::PostgresTicketRepository;
use taskflow::ticket::services::{CreateTicketRequest, TicketLifecycleService};
use taskflow::user::adapters::postgres::PostgresUserRepository;
use taskflow::user::services::{CreateUserRequest, UserDirectoryService};
use taskflow::workflow::adapters::postgres::PostgresWorkflowRepository;
use tracing::info;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Directory = UserDirectoryService<PostgresUserRepository, DefaultClock>;

const ADMIN_EMAIL: &str = "admin@taskflow.local";
const ADMIN_NAME: &str = "Administrator";

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = TrackerConfig::from_env()?;
    telemetry::init(config.log_format)?;
    let pool = build_pool(&config.database_url, config.pool_max_size)?;
    apply_schema(&pool).await?;
    info!("tracker schema applied");

    let clock = Arc::new(DefaultClock);
    let projects = ProjectService::new(
        Arc::new(PostgresProjectRepository::new(pool.clone())),
        Arc::clone(&clock),
    );
    if !projects.list_projects().await?.is_empty() {
        info!("projects already exist, skipping demo data");
        return Ok(());
    }

    let directory = UserDirectoryService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::clone(&clock),
    );
    let admin_id = ensure_admin(&directory).await?;
    let project = projects
        .create_project(
            CreateProjectRequest::new("DEMO", "Demo project")
                .with_description("Sample project created by taskflow_seed"),
        )
        .await?;
    projects.add_member(project.id(), admin_id).await?;

    let tickets = TicketLifecycleService::new(
        Arc::new(PostgresTicketRepository::new(pool.clone())),
        Arc::new(PostgresWorkflowRepository::new(pool)),
        Arc::new(TracingTicketEventPublisher),
        clock,
    )
    .with_config(&config);
    let ticket = tickets
        .create_ticket(
            CreateTicketRequest::new(project.id(), admin_id, "Explore the board")
                .with_description("Drag this ticket across the workflow columns."),
        )
        .await?;

    info!(project = %project.key(), ticket = %ticket.key(), %admin_id, "seeded demo data");
    Ok(())
}

async fn ensure_admin(directory: &Directory) -> Result<UserId, BoxError> {
    if let Some(existing) = directory.find_by_email(ADMIN_EMAIL).await? {
        return Ok(existing.id());
    }
    let admin = directory
        .create_user(CreateUserRequest::new(ADMIN_EMAIL, ADMIN_NAME).as_admin())
        .await?;
    Ok(admin.id())
}
