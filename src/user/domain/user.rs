//! User aggregate and its validated profile fields.

use super::UserDomainError;
use crate::project::domain::{CallerIdentity, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_EMAIL_LENGTH: usize = 256;
const MAX_DISPLAY_NAME_LENGTH: usize = 180;
const MAX_AVATAR_URL_LENGTH: usize = 200;

/// Trimmed login e-mail address.
///
/// Addresses are compared without regard to case; the stored spelling is
/// kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Creates a validated address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyEmail`] for a blank value,
    /// [`UserDomainError::EmailTooLong`] beyond 256 characters and
    /// [`UserDomainError::InvalidEmail`] when the value is not of the form
    /// `local@domain`.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyEmail);
        }
        if trimmed.chars().count() > MAX_EMAIL_LENGTH {
            return Err(UserDomainError::EmailTooLong);
        }
        let well_formed = trimmed.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !trimmed.contains(char::is_whitespace)
        });
        if !well_formed {
            return Err(UserDomainError::InvalidEmail(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when both addresses are the same ignoring case.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.to_lowercase() == other.0.to_lowercase()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, non-empty name shown for a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Creates a validated display name.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyDisplayName`] when the value is blank
    /// or [`UserDomainError::DisplayNameTooLong`] beyond 180 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyDisplayName);
        }
        if trimmed.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            return Err(UserDomainError::DisplayNameTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of a user's avatar image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Creates a validated avatar location.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyAvatarUrl`] for a blank value or
    /// [`UserDomainError::AvatarUrlTooLong`] beyond 200 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyAvatarUrl);
        }
        if trimmed.chars().count() > MAX_AVATAR_URL_LENGTH {
            return Err(UserDomainError::AvatarUrlTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the location as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    email: Email,
    display_name: DisplayName,
    avatar_url: Option<AvatarUrl>,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl NewUser {
    /// Prepares a regular user for insertion.
    #[must_use]
    pub fn new(email: Email, display_name: DisplayName, clock: &impl Clock) -> Self {
        Self {
            email,
            display_name,
            avatar_url: None,
            is_admin: false,
            created_at: clock.utc(),
        }
    }

    /// Sets the avatar location.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: AvatarUrl) -> Self {
        self.avatar_url = Some(avatar_url);
        self
    }

    /// Grants the administrator role.
    #[must_use]
    pub const fn as_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }

    /// Returns the login address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns the avatar location, if any.
    #[must_use]
    pub const fn avatar_url(&self) -> Option<&AvatarUrl> {
        self.avatar_url.as_ref()
    }

    /// Returns `true` when the user will be an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attaches the identifier assigned by storage.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            display_name: self.display_name,
            avatar_url: self.avatar_url,
            is_admin: self.is_admin,
            created_at: self.created_at,
        }
    }
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted identifier.
    pub id: UserId,
    /// Persisted login address.
    pub email: Email,
    /// Persisted display name.
    pub display_name: DisplayName,
    /// Persisted avatar location.
    pub avatar_url: Option<AvatarUrl>,
    /// Persisted administrator flag.
    pub is_admin: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A user known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    email: Email,
    display_name: DisplayName,
    avatar_url: Option<AvatarUrl>,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Rebuilds a user from storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            email: data.email,
            display_name: data.display_name,
            avatar_url: data.avatar_url,
            is_admin: data.is_admin,
            created_at: data.created_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the login address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns the avatar location, if any.
    #[must_use]
    pub const fn avatar_url(&self) -> Option<&AvatarUrl> {
        self.avatar_url.as_ref()
    }

    /// Returns `true` when the user holds the administrator role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the identity services expect for this user.
    #[must_use]
    pub const fn caller(&self) -> CallerIdentity {
        if self.is_admin {
            CallerIdentity::admin(self.id)
        } else {
            CallerIdentity::user(self.id)
        }
    }
}

/// Sorts users by display name, then identifier.
pub(crate) fn sort_by_display_name(users: &mut [User]) {
    users.sort_by(|left, right| {
        left.display_name
            .as_str()
            .cmp(right.display_name.as_str())
            .then(left.id.cmp(&right.id))
    });
}
