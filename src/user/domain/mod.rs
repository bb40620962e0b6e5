//! Domain model for directory users.

mod error;
mod user;

pub use error::UserDomainError;
pub use user::{AvatarUrl, DisplayName, Email, NewUser, PersistedUserData, User};

pub(crate) use user::sort_by_display_name;
