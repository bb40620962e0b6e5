//! Validated project key type.

use super::ProjectDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum key length, matching the `VARCHAR(130)` column.
const MAX_KEY_LENGTH: usize = 130;

/// Short, upper-case project key such as `DEMO`.
///
/// Keys are globally unique and immutable once the project exists; ticket
/// keys are formed as `<KEY>-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectKey(String);

impl ProjectKey {
    /// Creates a validated project key.
    ///
    /// The input is trimmed and upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectKey`] when the value is empty
    /// after trimming, [`ProjectDomainError::ProjectKeyTooLong`] when it
    /// exceeds 130 characters, or [`ProjectDomainError::InvalidProjectKey`]
    /// when it contains anything other than ASCII letters and digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();

        if normalized.is_empty() {
            return Err(ProjectDomainError::EmptyProjectKey);
        }

        if normalized.chars().count() > MAX_KEY_LENGTH {
            return Err(ProjectDomainError::ProjectKeyTooLong(raw));
        }

        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ProjectDomainError::InvalidProjectKey(raw));
        }

        Ok(Self(normalized))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProjectKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
