//! `PostgreSQL` repository implementation for the user directory.

use super::models::{NewUserRow, UserRow};
use crate::persistence::postgres::schema::users;
use crate::persistence::postgres::{PgPool, unique_violation, with_connection};
use crate::project::domain::UserId;
use crate::user::{
    domain::{AvatarUrl, DisplayName, Email, NewUser, PersistedUserData, User},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};

const USER_EMAIL_INDEX: &str = "idx_users_email";

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        with_connection(&self.pool, f).await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: &NewUser) -> UserRepositoryResult<User> {
        let email = user.email().clone();
        let new_row = NewUserRow {
            email: email.as_str().to_owned(),
            display_name: user.display_name().as_str().to_owned(),
            avatar_url: user.avatar_url().map(|url| url.as_str().to_owned()),
            is_admin: user.is_admin(),
            created_at: user.created_at(),
        };
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(users::table)
                .values(&new_row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .map_err(|err| {
                    if unique_violation(&err) == Some(USER_EMAIL_INDEX) {
                        UserRepositoryError::DuplicateEmail(email.clone())
                    } else {
                        UserRepositoryError::persistence(err)
                    }
                })?;
            row_to_user(row)
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.value()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &Email) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(sql::<Bool>("lower(email) = lower(").bind::<Text, _>(lookup).sql(")"))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(|connection| {
            let rows = users::table
                .order((users::display_name.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

/// Rebuilds a user from its row.
pub(crate) fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        email,
        display_name,
        avatar_url,
        is_admin,
        created_at,
    } = row;
    Ok(User::from_persisted(PersistedUserData {
        id: UserId::new(id),
        email: Email::new(email).map_err(UserRepositoryError::invalid_persisted_data)?,
        display_name: DisplayName::new(display_name)
            .map_err(UserRepositoryError::invalid_persisted_data)?,
        avatar_url: avatar_url
            .map(AvatarUrl::new)
            .transpose()
            .map_err(UserRepositoryError::invalid_persisted_data)?,
        is_admin,
        created_at,
    }))
}
