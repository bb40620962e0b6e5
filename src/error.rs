//! Caller-facing error classification shared by all service layers.

use serde::Serialize;
use std::fmt;

/// Coarse classification of a failed operation.
///
/// Service error enums expose a `kind()` accessor so that an outer layer
/// (HTTP, CLI) can choose a response without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input was rejected before any state change.
    Validation,
    /// The request collides with existing state (duplicate, in use).
    Conflict,
    /// The addressed entity does not exist or is not owned by the project.
    NotFound,
    /// Stored data is inconsistent with what the operation requires.
    Configuration,
    /// The caller is not allowed to reach the project.
    AccessDenied,
    /// The persistence layer or another collaborator failed.
    Persistence,
}

impl ErrorKind {
    /// Returns the canonical lowercase name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::Configuration => "configuration",
            Self::AccessDenied => "access_denied",
            Self::Persistence => "persistence",
        }
    }

    /// Returns `true` when retrying the same request unchanged cannot succeed.
    #[must_use]
    pub const fn is_caller_error(self) -> bool {
        matches!(
            self,
            Self::Validation | Self::Conflict | Self::NotFound | Self::AccessDenied
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
