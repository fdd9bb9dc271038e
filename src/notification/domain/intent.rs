//! Notification intents produced by the transition evaluator.

use crate::board::domain::{PersonHandle, ProjectId, Task, TaskStatus};
use serde::Serialize;
use std::fmt;

/// Who a notification is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientRole {
    /// The task's assignee only.
    Assignee,
    /// The project's manager only.
    Manager,
    /// Assignee and manager in a single message.
    Both,
}

/// Resolved recipients of one intent.
///
/// Recipients are de-duplicated: when the manager is also the assignee the
/// audience collapses to the assignee alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Audience {
    role: RecipientRole,
    recipients: Vec<PersonHandle>,
}

impl Audience {
    /// Addresses the assignee only.
    #[must_use]
    pub fn assignee(assignee: &PersonHandle) -> Self {
        Self {
            role: RecipientRole::Assignee,
            recipients: vec![assignee.clone()],
        }
    }

    /// Addresses the manager only.
    #[must_use]
    pub fn manager(manager: &PersonHandle) -> Self {
        Self {
            role: RecipientRole::Manager,
            recipients: vec![manager.clone()],
        }
    }

    /// Addresses the assignee plus the manager when one is configured and
    /// differs from the assignee.
    #[must_use]
    pub fn assignee_and_manager(assignee: &PersonHandle, manager: Option<&PersonHandle>) -> Self {
        match manager {
            Some(handle) if handle != assignee => Self {
                role: RecipientRole::Both,
                recipients: vec![assignee.clone(), handle.clone()],
            },
            _ => Self::assignee(assignee),
        }
    }

    /// Returns the recipient role.
    #[must_use]
    pub const fn role(&self) -> RecipientRole {
        self.role
    }

    /// Returns the recipients in mention order.
    #[must_use]
    pub fn recipients(&self) -> &[PersonHandle] {
        &self.recipients
    }
}

/// Task field tracked for change summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// Task title.
    Title,
    /// Calendar due date.
    DueDate,
    /// Assignee handle.
    Assignee,
    /// Free-text tags.
    Tags,
}

impl TaskField {
    /// Returns the label used in change summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::DueDate => "due date",
            Self::Assignee => "assignee",
            Self::Tags => "tags",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One changed field with its rendered old and new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    field: TaskField,
    old: String,
    new: String,
}

impl FieldChange {
    /// Creates a change entry. Blank values render as `(none)`.
    #[must_use]
    pub fn new(field: TaskField, old: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            field,
            old: display_value(old.into()),
            new: display_value(new.into()),
        }
    }

    /// Returns the changed field.
    #[must_use]
    pub const fn field(&self) -> TaskField {
        self.field
    }

    /// Returns the previous value.
    #[must_use]
    pub fn old(&self) -> &str {
        &self.old
    }

    /// Returns the new value.
    #[must_use]
    pub fn new_value(&self) -> &str {
        &self.new
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.field, self.old, self.new)
    }
}

fn display_value(value: String) -> String {
    if value.trim().is_empty() {
        "(none)".to_owned()
    } else {
        value
    }
}

/// What happened to the task; selects the message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// Task entered `IN_PROGRESS`.
    StartedWork,
    /// Task entered `REVIEW`.
    ReadyForReview,
    /// Task entered `DONE`.
    Completed,
    /// Task moved to `BACKLOG` or `ON_HOLD`.
    StatusChanged {
        /// Previous status.
        from: TaskStatus,
        /// New status.
        to: TaskStatus,
    },
    /// Non-status fields were edited.
    FieldsChanged {
        /// Every changed field, in title, due date, assignee, tags order.
        changes: Vec<FieldChange>,
    },
    /// Task was deleted.
    Deleted,
    /// Task is due in `days_left` days.
    DueSoon {
        /// Days until the due date.
        days_left: u32,
    },
    /// Task is due today.
    DueToday,
}

impl NotificationEvent {
    /// Returns the template name used to render this event.
    #[must_use]
    pub const fn template_name(&self) -> &'static str {
        match self {
            Self::StartedWork => "started_work",
            Self::ReadyForReview => "ready_for_review",
            Self::Completed => "completed",
            Self::StatusChanged { .. } => "status_changed",
            Self::FieldsChanged { .. } => "fields_changed",
            Self::Deleted => "deleted",
            Self::DueSoon { .. } => "due_soon",
            Self::DueToday => "due_today",
        }
    }

    /// Returns whether the event stems from a status transition.
    #[must_use]
    pub const fn is_status_event(&self) -> bool {
        matches!(
            self,
            Self::StartedWork | Self::ReadyForReview | Self::Completed | Self::StatusChanged { .. }
        )
    }
}

/// A computed notification awaiting rendering and dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationIntent {
    event: NotificationEvent,
    audience: Audience,
    task: Task,
    project_id: ProjectId,
}

impl NotificationIntent {
    /// Creates an intent about `task`, which carries the values to render
    /// (the post-mutation state, or the last-known state for deletions).
    #[must_use]
    pub fn new(event: NotificationEvent, audience: Audience, task: &Task) -> Self {
        Self {
            event,
            audience,
            task: task.clone(),
            project_id: task.project_id().clone(),
        }
    }

    /// Returns the event.
    #[must_use]
    pub const fn event(&self) -> &NotificationEvent {
        &self.event
    }

    /// Returns the audience.
    #[must_use]
    pub const fn audience(&self) -> &Audience {
        &self.audience
    }

    /// Returns the task snapshot the intent describes.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> &ProjectId {
        &self.project_id
    }
}
