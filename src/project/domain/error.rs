//! Error types for project domain validation.

use thiserror::Error;

/// Errors returned while constructing project domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project key is empty after trimming.
    #[error("project key must not be empty")]
    EmptyProjectKey,

    /// The project key contains characters other than ASCII letters and digits.
    #[error("project key '{0}' may only contain ASCII letters and digits")]
    InvalidProjectKey(String),

    /// The project key exceeds the storage limit.
    #[error("project key exceeds 130 character limit: {0}")]
    ProjectKeyTooLong(String),

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The project name exceeds the storage limit.
    #[error("project name exceeds 160 character limit")]
    ProjectNameTooLong,

    /// The project description exceeds the storage limit.
    #[error("project description exceeds 600 character limit")]
    DescriptionTooLong,
}
