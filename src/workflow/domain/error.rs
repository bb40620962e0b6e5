//! Error types for workflow domain validation.

use thiserror::Error;

/// Errors returned while constructing workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The status name is empty after trimming.
    #[error("status name must not be empty")]
    EmptyStatusName,

    /// The status name exceeds the storage limit.
    #[error("status name exceeds 120 character limit: {0}")]
    StatusNameTooLong(String),

    /// A stored sort order is outside the representable range.
    #[error("invalid sort order {0}, expected a non-negative integer")]
    InvalidSortOrder(i64),

    /// Appending another status would overflow the sort order.
    #[error("sort order overflow: no further statuses can be appended")]
    SortOrderOverflow,
}
