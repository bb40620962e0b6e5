//! Human-readable ticket keys such as `DEMO-12`.

use super::TicketDomainError;
use crate::project::domain::ProjectKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket key formed from the project key and the per-project sequence.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketKey(String);

impl TicketKey {
    /// Builds the key for ticket number `sequence` of a project.
    #[must_use]
    pub fn compose(project_key: &ProjectKey, sequence: u64) -> Self {
        Self(format!("{project_key}-{sequence}"))
    }

    /// Parses a key, accepting any letter case.
    ///
    /// # Errors
    ///
    /// Returns [`TicketDomainError::InvalidTicketKey`] unless the value is an
    /// alphanumeric project key, a dash and a positive number.
    pub fn parse(value: &str) -> Result<Self, TicketDomainError> {
        let normalized = value.trim().to_ascii_uppercase();
        let invalid = || TicketDomainError::InvalidTicketKey(value.to_owned());
        let (prefix, number) = normalized.rsplit_once('-').ok_or_else(invalid)?;
        let prefix_valid =
            !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric());
        let sequence = number.parse::<u64>().map_err(|_| invalid())?;
        if !prefix_valid || sequence == 0 || number.starts_with('+') {
            return Err(invalid());
        }
        Ok(Self(normalized))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
