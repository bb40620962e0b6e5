//! Error types for user domain validation.

use thiserror::Error;

/// Errors returned while constructing user domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The e-mail address is empty after trimming.
    #[error("email must not be empty")]
    EmptyEmail,

    /// The e-mail address has no local part or no domain.
    #[error("email '{0}' is not a valid address")]
    InvalidEmail(String),

    /// The e-mail address exceeds the storage limit.
    #[error("email exceeds 256 character limit")]
    EmailTooLong,

    /// The display name is empty after trimming.
    #[error("display name must not be empty")]
    EmptyDisplayName,

    /// The display name exceeds the storage limit.
    #[error("display name exceeds 180 character limit")]
    DisplayNameTooLong,

    /// The avatar location is empty after trimming.
    #[error("avatar url must not be empty")]
    EmptyAvatarUrl,

    /// The avatar location exceeds the storage limit.
    #[error("avatar url exceeds 200 character limit")]
    AvatarUrlTooLong,
}
