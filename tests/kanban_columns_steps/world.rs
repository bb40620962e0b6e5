//! Shared world state for Kanban column BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskflow::board::{BoardError, KanbanBoardService, KanbanColumnView};
use taskflow::persistence::InMemoryDatabase;
use taskflow::project::{
    adapters::memory::InMemoryProjectRepository,
    domain::{CallerIdentity, Project, UserId},
    services::MembershipAccessGate,
};
use taskflow::user::{
    adapters::memory::InMemoryUserRepository,
    domain::{DisplayName, Email, NewUser, User},
    ports::UserRepository,
};
use taskflow::workflow::adapters::memory::InMemoryWorkflowRepository;

/// Board type used by the BDD world.
pub type TestBoard = KanbanBoardService<
    MembershipAccessGate<InMemoryProjectRepository>,
    InMemoryWorkflowRepository,
>;

/// Administrator used to set up workflows.
pub const ADMIN: UserId = UserId::new(1000);

/// One expected column: status name, position and visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Status name.
    pub name: String,
    /// Position on the board.
    pub position: i32,
    /// Whether the column is shown.
    pub is_visible: bool,
}

/// Scenario world for Kanban column behaviour tests.
pub struct ColumnsWorld {
    /// User directory backing memberships.
    pub users: InMemoryUserRepository,
    /// Project storage, also consulted by the access gate.
    pub projects: Arc<InMemoryProjectRepository>,
    /// The board facade under test.
    pub board: TestBoard,
    /// Project created by the scenario.
    pub project: Option<Project>,
    /// Caller whose board is exercised.
    pub caller: Option<CallerIdentity>,
    /// Columns returned by the last successful call.
    pub columns: Vec<KanbanColumnView>,
    /// Error returned by the last failing call.
    pub last_error: Option<BoardError>,
}

impl ColumnsWorld {
    /// Creates a world over an empty database.
    #[must_use]
    pub fn new() -> Self {
        let database = InMemoryDatabase::new();
        let projects = Arc::new(InMemoryProjectRepository::new(database.clone()));
        let board = KanbanBoardService::new(
            Arc::new(MembershipAccessGate::new(Arc::clone(&projects))),
            Arc::new(InMemoryWorkflowRepository::new(database.clone())),
        );
        Self {
            users: InMemoryUserRepository::new(database),
            projects,
            board,
            project: None,
            caller: None,
            columns: Vec::new(),
            last_error: None,
        }
    }

    /// Returns the scenario project.
    ///
    /// # Errors
    ///
    /// Returns an error when no project has been created yet.
    pub fn project(&self) -> Result<&Project, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no project in scenario world"))
    }

    /// Registers a user called `name` in the directory.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is invalid or already registered.
    pub fn register(&self, name: &str) -> Result<User, eyre::Report> {
        let draft = NewUser::new(
            Email::new(format!("{}@example.test", name.to_lowercase()))?,
            DisplayName::new(name)?,
            &DefaultClock,
        );
        Ok(run_async(self.users.create(&draft))?)
    }

    /// Returns the scenario caller.
    ///
    /// # Errors
    ///
    /// Returns an error when no caller has been chosen yet.
    pub fn caller(&self) -> Result<CallerIdentity, eyre::Report> {
        self.caller
            .ok_or_else(|| eyre::eyre!("no caller in scenario world"))
    }
}

impl Default for ColumnsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ColumnsWorld {
    ColumnsWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a layout such as `"Doing:0:visible, Done:1:hidden"`.
///
/// # Errors
///
/// Returns an error when an entry is not `name:position:visible|hidden`.
pub fn parse_layout(layout: &str) -> Result<Vec<ColumnSpec>, eyre::Report> {
    layout
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.split(':');
            let (Some(name), Some(position), Some(visibility), None) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(eyre::eyre!("malformed layout entry '{entry}'"));
            };
            let is_visible = match visibility {
                "visible" => true,
                "hidden" => false,
                other => return Err(eyre::eyre!("unknown visibility '{other}'")),
            };
            Ok(ColumnSpec {
                name: name.to_owned(),
                position: position.parse()?,
                is_visible,
            })
        })
        .collect()
}
