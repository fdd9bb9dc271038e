//! Task aggregate root and related lifecycle types.

use super::{DueDate, ParseTaskStatusError, PersonHandle, ProjectId, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Board column a task sits in.
///
/// Every status may move to every other status; the board imposes no
/// workflow order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is queued but not yet scheduled.
    #[serde(alias = "TODO")]
    Backlog,
    /// Task work is temporarily paused.
    OnHold,
    /// Task is being worked on.
    InProgress,
    /// Task is awaiting the manager's review.
    Review,
    /// Task has been completed.
    Done,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [Self; 5] = [
        Self::Backlog,
        Self::OnHold,
        Self::InProgress,
        Self::Review,
        Self::Done,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "BACKLOG",
            Self::OnHold => "ON_HOLD",
            Self::InProgress => "IN_PROGRESS",
            Self::Review => "REVIEW",
            Self::Done => "DONE",
        }
    }

    /// Returns the human-readable column label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::OnHold => "On Hold",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }

    /// Returns whether the status ends the task's active life.
    ///
    /// Terminal statuses are not enforced; a done task may still be moved.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "BACKLOG" | "TODO" => Ok(Self::Backlog),
            "ON_HOLD" => Ok(Self::OnHold),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "REVIEW" => Ok(Self::Review),
            "DONE" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title, trimmed and non-empty.
    pub title: String,
    /// Calendar due date.
    pub due_date: DueDate,
    /// Person executing the task.
    pub assignee: PersonHandle,
    /// Free-text tags or comment.
    pub tags: String,
    /// Initial board column.
    pub status: TaskStatus,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    due_date: DueDate,
    assignee: PersonHandle,
    tags: String,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted title.
    pub title: String,
    /// Persisted due date.
    pub due_date: DueDate,
    /// Persisted assignee.
    pub assignee: PersonHandle,
    /// Persisted tags.
    pub tags: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskTitle`] when the title is blank.
    pub fn new(new_task: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            project_id: new_task.project_id,
            title: normalize_title(&new_task.title)?,
            due_date: new_task.due_date,
            assignee: new_task.assignee,
            tags: new_task.tags.trim().to_owned(),
            status: new_task.status,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            due_date: data.due_date,
            assignee: data.assignee,
            tags: data.tags,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DueDate {
        self.due_date
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> &PersonHandle {
        &self.assignee
    }

    /// Returns the free-text tags.
    #[must_use]
    pub fn tags(&self) -> &str {
        &self.tags
    }

    /// Returns the board status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a partial update.
    ///
    /// Fields absent from the patch are left untouched. Setting a field to its
    /// current value is accepted and still refreshes `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyUpdate`] when the patch carries no
    /// fields; the task is left unchanged.
    pub fn apply(&mut self, patch: TaskPatch, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if patch.is_empty() {
            return Err(TaskDomainError::EmptyUpdate);
        }
        let TaskPatch {
            title,
            due_date,
            assignee,
            tags,
            status,
        } = patch;

        if let Some(new_title) = title {
            self.title = new_title;
        }
        if let Some(new_due_date) = due_date {
            self.due_date = new_due_date;
        }
        if let Some(new_assignee) = assignee {
            self.assignee = new_assignee;
        }
        if let Some(new_tags) = tags {
            self.tags = new_tags;
        }
        if let Some(new_status) = status {
            self.status = new_status;
        }
        self.updated_at = clock.utc();
        Ok(())
    }
}

/// Validated partial update for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    due_date: Option<DueDate>,
    assignee: Option<PersonHandle>,
    tags: Option<String>,
    status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a new title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskTitle`] when the title is blank.
    pub fn with_title(mut self, title: &str) -> Result<Self, TaskDomainError> {
        self.title = Some(normalize_title(title)?);
        Ok(self)
    }

    /// Sets a new due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DueDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets a new assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: PersonHandle) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Sets new tags. Blank tags clear the field.
    #[must_use]
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags = Some(tags.trim().to_owned());
        self
    }

    /// Sets a new status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns whether the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.due_date.is_none()
            && self.assignee.is_none()
            && self.tags.is_none()
            && self.status.is_none()
    }
}

fn normalize_title(title: &str) -> Result<String, TaskDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTaskTitle);
    }
    Ok(trimmed.to_owned())
}
