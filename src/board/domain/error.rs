//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing or mutating board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The project identifier is empty after trimming.
    #[error("project identifier must not be empty")]
    EmptyProjectId,

    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// A person handle (assignee or manager) is empty after trimming.
    #[error("{field} must not be empty")]
    EmptyHandle {
        /// Name of the field holding the handle.
        field: &'static str,
    },

    /// The due date is not a calendar date or date-time.
    #[error("invalid due date '{0}', expected YYYY-MM-DD or an ISO-8601 date-time")]
    InvalidDueDate(String),

    /// The channel key contains characters other than `[a-z0-9_-]`.
    #[error("invalid channel key '{0}'")]
    InvalidChannelKey(String),

    /// A partial update carried no fields.
    #[error("task update must change at least one field")]
    EmptyUpdate,
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
