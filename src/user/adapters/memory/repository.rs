//! User repository over the shared in-memory database.

use crate::persistence::InMemoryDatabase;
use crate::project::domain::UserId;
use crate::user::{
    domain::{Email, NewUser, User, sort_by_display_name},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;

/// Thread-safe in-memory user repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    database: InMemoryDatabase,
}

impl InMemoryUserRepository {
    /// Creates a repository over `database`.
    #[must_use]
    pub const fn new(database: InMemoryDatabase) -> Self {
        Self { database }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> UserRepositoryResult<User> {
        self.database.transaction(|tables| {
            if tables
                .users
                .values()
                .any(|stored| stored.email().matches(user.email()))
            {
                return Err(UserRepositoryError::DuplicateEmail(user.email().clone()));
            }
            let user_id = UserId::new(tables.next_id());
            let created = user.clone().into_user(user_id);
            tables.users.insert(user_id, created.clone());
            Ok(created)
        })?
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        Ok(self.database.read(|tables| tables.users.get(&id).cloned())?)
    }

    async fn find_by_email(&self, email: &Email) -> UserRepositoryResult<Option<User>> {
        Ok(self.database.read(|tables| {
            tables
                .users
                .values()
                .find(|user| user.email().matches(email))
                .cloned()
        })?)
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        let mut users: Vec<User> = self
            .database
            .read(|tables| tables.users.values().cloned().collect())?;
        sort_by_display_name(&mut users);
        Ok(users)
    }
}
