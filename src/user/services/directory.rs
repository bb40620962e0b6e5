//! Service layer for registering and looking up directory users.

use crate::error::ErrorKind;
use crate::project::domain::{CallerIdentity, UserId};
use crate::user::{
    domain::{AvatarUrl, DisplayName, Email, NewUser, User, UserDomainError},
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    email: String,
    display_name: String,
    avatar_url: Option<String>,
    is_admin: bool,
}

impl CreateUserRequest {
    /// Creates a request for a regular user.
    #[must_use]
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            display_name: display_name.into(),
            avatar_url: None,
            is_admin: false,
        }
    }

    /// Sets the avatar location.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Requests the administrator role.
    #[must_use]
    pub const fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] UserDomainError),

    /// Another user already has the address.
    #[error("email already registered: {0}")]
    DuplicateEmail(Email),

    /// The user does not exist.
    #[error("user not found: {0}")]
    NotFound(UserId),

    /// The caller lacks the administrator role.
    #[error("user {0} is not an administrator")]
    AdminRequired(UserId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(UserRepositoryError),
}

impl From<UserRepositoryError> for UserServiceError {
    fn from(err: UserRepositoryError) -> Self {
        match err {
            UserRepositoryError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            other => Self::Repository(other),
        }
    }
}

impl UserServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::DuplicateEmail(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AdminRequired(_) => ErrorKind::AccessDenied,
            Self::Repository(_) => ErrorKind::Persistence,
        }
    }
}

/// Result type for user directory operations.
pub type UserServiceResult<T> = Result<T, UserServiceError>;

/// User directory orchestration service.
#[derive(Clone)]
pub struct UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Domain`] for invalid profile fields and
    /// [`UserServiceError::DuplicateEmail`] when the address is taken.
    pub async fn create_user(&self, request: CreateUserRequest) -> UserServiceResult<User> {
        let CreateUserRequest {
            email,
            display_name,
            avatar_url,
            is_admin,
        } = request;
        let mut draft = NewUser::new(
            Email::new(email)?,
            DisplayName::new(display_name)?,
            &*self.clock,
        );
        if let Some(url) = avatar_url {
            draft = draft.with_avatar_url(AvatarUrl::new(url)?);
        }
        if is_admin {
            draft = draft.as_admin();
        }
        let user = self.repository.create(&draft).await?;
        info!(user_id = %user.id(), is_admin = user.is_admin(), "registered user");
        Ok(user)
    }

    /// Lists every user ordered by display name.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::AdminRequired`] unless the caller is an
    /// administrator.
    pub async fn list_users(&self, caller: &CallerIdentity) -> UserServiceResult<Vec<User>> {
        require_admin(caller)?;
        Ok(self.repository.list_all().await?)
    }

    /// Returns one user.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::AdminRequired`] unless the caller is an
    /// administrator and [`UserServiceError::NotFound`] for an unknown id.
    pub async fn get_user(
        &self,
        caller: &CallerIdentity,
        user_id: UserId,
    ) -> UserServiceResult<User> {
        require_admin(caller)?;
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserServiceError::NotFound(user_id))
    }

    /// Returns whether the stored account holds the administrator role.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::NotFound`] for an unknown id.
    pub async fn is_admin(&self, user_id: UserId) -> UserServiceResult<bool> {
        Ok(self.resolve_caller(user_id).await?.is_admin())
    }

    /// Builds the caller identity of a stored user.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::NotFound`] for an unknown id.
    pub async fn resolve_caller(&self, user_id: UserId) -> UserServiceResult<CallerIdentity> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or(UserServiceError::NotFound(user_id))?;
        Ok(user.caller())
    }

    /// Finds a user by login address, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`UserServiceError::Domain`] for a malformed address.
    pub async fn find_by_email(&self, email: &str) -> UserServiceResult<Option<User>> {
        let lookup = Email::new(email)?;
        Ok(self.repository.find_by_email(&lookup).await?)
    }
}

fn require_admin(caller: &CallerIdentity) -> UserServiceResult<()> {
    if caller.is_admin() {
        return Ok(());
    }
    debug!(user_id = %caller.user_id(), "directory access denied");
    Err(UserServiceError::AdminRequired(caller.user_id()))
}
