//! Workflow statuses and the registry ordering policy.

use super::{StatusId, WorkflowDomainError};
use crate::project::domain::ProjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 120;

/// Trimmed, non-empty status name.
///
/// Equality is exact; uniqueness within a project is case-insensitive and is
/// checked with [`StatusName::folded`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusName(String);

impl StatusName {
    /// Creates a validated status name.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyStatusName`] when the value is blank
    /// or [`WorkflowDomainError::StatusNameTooLong`] when it exceeds 120
    /// characters.
    pub fn new(value: impl Into<String>) -> Result<Self, WorkflowDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WorkflowDomainError::EmptyStatusName);
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(WorkflowDomainError::StatusNameTooLong(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub(super) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the lower-cased form used for uniqueness checks.
    #[must_use]
    pub fn folded(&self) -> String {
        self.0.to_lowercase()
    }

    /// Returns `true` when both names collide under case-insensitive
    /// comparison.
    #[must_use]
    pub fn collides_with(&self, other: &Self) -> bool {
        self.folded() == other.folded()
    }
}

impl AsRef<str> for StatusName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for StatusName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative position of a status in its project's workflow.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SortOrder(u32);

impl SortOrder {
    /// Wraps a sort order value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the sort order that appends after `current_max`.
    ///
    /// An empty project starts at zero.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::SortOrderOverflow`] when `current_max`
    /// is already the largest representable value.
    pub fn following(current_max: Option<Self>) -> Result<Self, WorkflowDomainError> {
        match current_max {
            None => Ok(Self(0)),
            Some(max) => max
                .0
                .checked_add(1)
                .map(Self)
                .ok_or(WorkflowDomainError::SortOrderOverflow),
        }
    }
}

impl TryFrom<i32> for SortOrder {
    type Error = WorkflowDomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Self)
            .map_err(|_| WorkflowDomainError::InvalidSortOrder(i64::from(value)))
    }
}

impl TryFrom<SortOrder> for i32 {
    type Error = WorkflowDomainError;

    fn try_from(value: SortOrder) -> Result<Self, Self::Error> {
        Self::try_from(value.0).map_err(|_| WorkflowDomainError::InvalidSortOrder(i64::from(value.0)))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A status that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectStatus {
    project_id: ProjectId,
    name: StatusName,
    sort_order: SortOrder,
    is_default: bool,
}

impl NewProjectStatus {
    /// Prepares a status with an explicit position and default flag.
    #[must_use]
    pub const fn new(
        project_id: ProjectId,
        name: StatusName,
        sort_order: SortOrder,
        is_default: bool,
    ) -> Self {
        Self {
            project_id,
            name,
            sort_order,
            is_default,
        }
    }

    /// Prepares a non-default status appended after `current_max`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::SortOrderOverflow`] when no further sort
    /// order is available.
    pub fn appended(
        project_id: ProjectId,
        name: StatusName,
        current_max: Option<SortOrder>,
    ) -> Result<Self, WorkflowDomainError> {
        Ok(Self::new(
            project_id,
            name,
            SortOrder::following(current_max)?,
            false,
        ))
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the status name.
    #[must_use]
    pub const fn name(&self) -> &StatusName {
        &self.name
    }

    /// Returns the sort order.
    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Returns whether the status is flagged default.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// Attaches the identifier assigned by storage.
    #[must_use]
    pub fn into_status(self, id: StatusId) -> ProjectStatus {
        ProjectStatus {
            id,
            project_id: self.project_id,
            name: self.name,
            sort_order: self.sort_order,
            is_default: self.is_default,
        }
    }
}

/// Parameter object for reconstructing a persisted status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedStatusData {
    /// Persisted identifier.
    pub id: StatusId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Persisted name.
    pub name: StatusName,
    /// Persisted sort order.
    pub sort_order: SortOrder,
    /// Persisted default flag.
    pub is_default: bool,
}

/// One workflow state of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatus {
    id: StatusId,
    project_id: ProjectId,
    name: StatusName,
    sort_order: SortOrder,
    is_default: bool,
}

impl ProjectStatus {
    /// Reconstructs a status from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedStatusData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            sort_order: data.sort_order,
            is_default: data.is_default,
        }
    }

    /// Returns the status identifier.
    #[must_use]
    pub const fn id(&self) -> StatusId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the status name.
    #[must_use]
    pub const fn name(&self) -> &StatusName {
        &self.name
    }

    /// Returns the sort order.
    #[must_use]
    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Returns whether the status is flagged default.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.is_default
    }

    /// Replaces the name. Sort order and default flag are left alone.
    pub fn rename(&mut self, name: StatusName) {
        self.name = name;
    }

    const fn canonical_key(&self) -> (SortOrder, StatusId) {
        (self.sort_order, self.id)
    }
}

/// Sorts statuses into canonical workflow order: sort order, then id.
pub fn sort_canonical(statuses: &mut [ProjectStatus]) {
    statuses.sort_by_key(ProjectStatus::canonical_key);
}

/// Picks the status a new ticket lands in.
///
/// Among statuses flagged default the first in canonical order wins. When no
/// status is flagged the first status overall is used. Returns `None` for an
/// empty workflow.
#[must_use]
pub fn resolve_default_status(statuses: &[ProjectStatus]) -> Option<&ProjectStatus> {
    statuses
        .iter()
        .filter(|status| status.is_default())
        .min_by_key(|status| status.canonical_key())
        .or_else(|| statuses.iter().min_by_key(|status| status.canonical_key()))
}
