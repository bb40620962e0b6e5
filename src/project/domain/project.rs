//! Project aggregate and its validated name type.

use super::{ProjectDomainError, ProjectId, ProjectKey};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 160;
const MAX_DESCRIPTION_LENGTH: usize = 600;

/// Trimmed, non-empty project display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Creates a validated project name.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectName`] when the value is
    /// blank or [`ProjectDomainError::ProjectNameTooLong`] when it exceeds
    /// 160 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ProjectDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyProjectName);
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(ProjectDomainError::ProjectNameTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_description(description: Option<String>) -> Result<Option<String>, ProjectDomainError> {
    match description {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LENGTH => {
            Err(ProjectDomainError::DescriptionTooLong)
        }
        other => Ok(other),
    }
}

/// A project that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    key: ProjectKey,
    name: ProjectName,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl NewProject {
    /// Prepares a project for insertion.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::DescriptionTooLong`] when the description
    /// exceeds 600 characters.
    pub fn new(
        key: ProjectKey,
        name: ProjectName,
        description: Option<String>,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        Ok(Self {
            key,
            name,
            description: validate_description(description)?,
            created_at: clock.utc(),
        })
    }

    /// Returns the project key.
    #[must_use]
    pub const fn key(&self) -> &ProjectKey {
        &self.key
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attaches the identifier assigned by storage.
    #[must_use]
    pub fn into_project(self, id: ProjectId) -> Project {
        Project {
            id,
            key: self.key,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
        }
    }
}

/// Parameter object for reconstructing a persisted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted identifier.
    pub id: ProjectId,
    /// Persisted key.
    pub key: ProjectKey,
    /// Persisted name.
    pub name: ProjectName,
    /// Persisted description.
    pub description: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Project aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    key: ProjectKey,
    name: ProjectName,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl Project {
    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            key: data.key,
            name: data.name,
            description: data.description,
            created_at: data.created_at,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the immutable project key.
    #[must_use]
    pub const fn key(&self) -> &ProjectKey {
        &self.key
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Replaces the display name.
    pub fn rename(&mut self, name: ProjectName) {
        self.name = name;
    }

    /// Replaces the description.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::DescriptionTooLong`] when the description
    /// exceeds 600 characters.
    pub fn describe(&mut self, description: String) -> Result<(), ProjectDomainError> {
        self.description = validate_description(Some(description))?;
        Ok(())
    }
}
