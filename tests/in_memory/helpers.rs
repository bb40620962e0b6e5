//! Shared wiring for in-memory tracker integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::board::KanbanBoardService;
use taskflow::persistence::InMemoryDatabase;
use taskflow::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{Project, UserId},
    services::{CreateProjectRequest, MembershipAccessGate, ProjectService},
};
use taskflow::ticket::{
    adapters::memory::{InMemoryTicketEventPublisher, InMemoryTicketRepository},
    services::TicketLifecycleService,
};
use taskflow::user::{
    adapters::memory::InMemoryUserRepository,
    domain::User,
    services::{CreateUserRequest, UserDirectoryService},
};
use taskflow::workflow::adapters::memory::InMemoryWorkflowRepository;

/// Project service over the shared database.
pub type Projects = ProjectService<InMemoryProjectRepository, DefaultClock>;

/// Board facade gated by project membership.
pub type Board = KanbanBoardService<
    MembershipAccessGate<InMemoryProjectRepository>,
    InMemoryWorkflowRepository,
>;

/// User directory over the shared database.
pub type Users = UserDirectoryService<InMemoryUserRepository, DefaultClock>;

/// Ticket service recording its notifications.
pub type Tickets = TicketLifecycleService<
    InMemoryTicketRepository,
    InMemoryWorkflowRepository,
    InMemoryTicketEventPublisher,
    DefaultClock,
>;

/// Every service wired to one in-memory database.
pub struct Tracker {
    /// User directory.
    pub users: Users,
    /// Project registry.
    pub projects: Projects,
    /// Board facade.
    pub board: Board,
    /// Ticket lifecycle.
    pub tickets: Tickets,
    /// Notifications published by `tickets`.
    pub publisher: Arc<InMemoryTicketEventPublisher>,
}

impl Tracker {
    /// Registers a regular user named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the user cannot be stored.
    pub async fn user(&self, name: &str) -> Result<User, eyre::Report> {
        let email = format!("{}@example.test", name.to_lowercase());
        Ok(self
            .users
            .create_user(CreateUserRequest::new(email, name))
            .await?)
    }

    /// Registers an administrator named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the user cannot be stored.
    pub async fn admin(&self, name: &str) -> Result<User, eyre::Report> {
        let email = format!("{}@example.test", name.to_lowercase());
        Ok(self
            .users
            .create_user(CreateUserRequest::new(email, name).as_admin())
            .await?)
    }

    /// Creates a project with the standard workflow and adds `members`.
    ///
    /// # Errors
    ///
    /// Returns an error when the project or a membership cannot be stored.
    pub async fn project_with_members(
        &self,
        key: &str,
        members: &[UserId],
    ) -> Result<Project, eyre::Report> {
        let project = self
            .projects
            .create_project(CreateProjectRequest::new(key, format!("{key} project")))
            .await?;
        for member in members {
            self.projects.add_member(project.id(), *member).await?;
        }
        Ok(project)
    }
}

/// Provides a fresh tracker for each test.
#[fixture]
pub fn tracker() -> Tracker {
    let database = InMemoryDatabase::new();
    let project_repository = Arc::new(InMemoryProjectRepository::new(database.clone()));
    let workflow = Arc::new(InMemoryWorkflowRepository::new(database.clone()));
    let publisher = Arc::new(InMemoryTicketEventPublisher::new());
    Tracker {
        users: UserDirectoryService::new(
            Arc::new(InMemoryUserRepository::new(database.clone())),
            Arc::new(DefaultClock),
        ),
        projects: ProjectService::new(Arc::clone(&project_repository), Arc::new(DefaultClock)),
        board: KanbanBoardService::new(
            Arc::new(MembershipAccessGate::new(project_repository)),
            Arc::clone(&workflow),
        ),
        tickets: TicketLifecycleService::new(
            Arc::new(InMemoryTicketRepository::new(database)),
            workflow,
            Arc::clone(&publisher),
            Arc::new(DefaultClock),
        ),
        publisher,
    }
}
