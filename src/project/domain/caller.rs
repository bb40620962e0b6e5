//! Resolved identity of the caller of a board operation.

use super::UserId;
use serde::{Deserialize, Serialize};

/// Identity handed to services after authentication.
///
/// The authentication layer resolves the current user and whether they hold
/// the administrator role; everything downstream receives this value
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerIdentity {
    user_id: UserId,
    is_admin: bool,
}

impl CallerIdentity {
    /// Identity of a regular user.
    #[must_use]
    pub const fn user(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: false,
        }
    }

    /// Identity of a user holding the administrator role.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            is_admin: true,
        }
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns `true` when the caller is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.is_admin
    }
}
