//! Transition evaluator: decides which notifications a task change warrants.
//!
//! The evaluator is pure. It never performs I/O and cannot fail; given the
//! same inputs it returns the same intents in the same order (status intent
//! first, then the field-change summary).

use super::{Audience, FieldChange, NotificationEvent, NotificationIntent, TaskField};
use crate::board::domain::{Project, Task, TaskStatus};
use chrono::{Days, NaiveDate};

/// Default number of days before the due date at which the reminder fires.
pub const DEFAULT_REMINDER_DAYS: u32 = 3;

/// A committed task mutation, viewed from the notification side.
#[derive(Debug, Clone, Copy)]
pub enum TaskMutation<'a> {
    /// The task was created.
    Created(&'a Task),
    /// The task was updated.
    Updated {
        /// State before the update.
        before: &'a Task,
        /// State after the update.
        after: &'a Task,
    },
    /// The task was deleted; carries its last-known state.
    Deleted(&'a Task),
}

/// Which tasks the deadline scan considers and when it reminds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlinePolicy {
    reminder_days: u32,
    excluded: Vec<TaskStatus>,
}

impl DeadlinePolicy {
    /// Creates a policy reminding `reminder_days` before the due date and
    /// skipping tasks in terminal statuses.
    #[must_use]
    pub fn new(reminder_days: u32) -> Self {
        Self {
            reminder_days,
            excluded: TaskStatus::ALL
                .into_iter()
                .filter(|status| status.is_terminal())
                .collect(),
        }
    }

    /// Replaces the set of statuses excluded from the scan.
    #[must_use]
    pub fn with_excluded(mut self, excluded: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.excluded = excluded.into_iter().collect();
        self
    }

    /// Returns the reminder lead time in days.
    #[must_use]
    pub const fn reminder_days(&self) -> u32 {
        self.reminder_days
    }

    /// Returns whether tasks in `status` are scanned.
    #[must_use]
    pub fn covers(&self, status: TaskStatus) -> bool {
        !self.excluded.contains(&status)
    }

    /// Returns the reminder date for a scan run on `today`.
    #[must_use]
    pub fn reminder_date(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_add_days(Days::new(u64::from(self.reminder_days)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_REMINDER_DAYS)
    }
}

/// Maps task mutations and deadlines to notification intents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionEvaluator {
    deadline: DeadlinePolicy,
}

impl TransitionEvaluator {
    /// Creates an evaluator with the given deadline policy.
    #[must_use]
    pub const fn new(deadline: DeadlinePolicy) -> Self {
        Self { deadline }
    }

    /// Returns the deadline policy.
    #[must_use]
    pub const fn deadline_policy(&self) -> &DeadlinePolicy {
        &self.deadline
    }

    /// Computes the intents for a committed mutation of a task in `project`.
    #[must_use]
    pub fn evaluate(
        &self,
        mutation: TaskMutation<'_>,
        project: &Project,
    ) -> Vec<NotificationIntent> {
        match mutation {
            TaskMutation::Created(task) => status_intent(None, task, project).into_iter().collect(),
            TaskMutation::Updated { before, after } => {
                let mut intents = Vec::with_capacity(2);
                intents.extend(status_intent(Some(before.status()), after, project));
                intents.extend(fields_changed_intent(before, after, project));
                intents
            }
            TaskMutation::Deleted(task) => vec![NotificationIntent::new(
                NotificationEvent::Deleted,
                Audience::assignee_and_manager(task.assignee(), project.manager()),
                task,
            )],
        }
    }

    /// Computes the deadline-proximity intent for `task` on `today`, if any.
    ///
    /// A task due exactly `reminder_days` ahead notifies its assignee; a task
    /// due today notifies the assignee and the manager.
    #[must_use]
    pub fn evaluate_deadline(
        &self,
        task: &Task,
        project: &Project,
        today: NaiveDate,
    ) -> Option<NotificationIntent> {
        if !self.deadline.covers(task.status()) {
            return None;
        }
        let due = task.due_date().date();
        if due == today {
            return Some(NotificationIntent::new(
                NotificationEvent::DueToday,
                Audience::assignee_and_manager(task.assignee(), project.manager()),
                task,
            ));
        }
        if due == self.deadline.reminder_date(today) {
            return Some(NotificationIntent::new(
                NotificationEvent::DueSoon {
                    days_left: self.deadline.reminder_days(),
                },
                Audience::assignee(task.assignee()),
                task,
            ));
        }
        None
    }
}

fn status_intent(
    before: Option<TaskStatus>,
    after: &Task,
    project: &Project,
) -> Option<NotificationIntent> {
    let to = after.status();
    if before == Some(to) {
        return None;
    }
    let manager = project.manager();
    let (event, audience) = match to {
        TaskStatus::InProgress => (
            NotificationEvent::StartedWork,
            Audience::assignee(after.assignee()),
        ),
        TaskStatus::Review => (
            NotificationEvent::ReadyForReview,
            Audience::manager(manager?),
        ),
        TaskStatus::Done => (
            NotificationEvent::Completed,
            Audience::assignee_and_manager(after.assignee(), manager),
        ),
        TaskStatus::Backlog | TaskStatus::OnHold => (
            NotificationEvent::StatusChanged { from: before?, to },
            Audience::manager(manager?),
        ),
    };
    Some(NotificationIntent::new(event, audience, after))
}

fn fields_changed_intent(
    before: &Task,
    after: &Task,
    project: &Project,
) -> Option<NotificationIntent> {
    let changes = field_changes(before, after);
    if changes.is_empty() {
        return None;
    }
    Some(NotificationIntent::new(
        NotificationEvent::FieldsChanged { changes },
        Audience::assignee_and_manager(after.assignee(), project.manager()),
        after,
    ))
}

/// Lists the non-status fields that differ between `before` and `after`.
#[must_use]
pub fn field_changes(before: &Task, after: &Task) -> Vec<FieldChange> {
    let mut changes = Vec::new();
    if before.title() != after.title() {
        changes.push(FieldChange::new(TaskField::Title, before.title(), after.title()));
    }
    if before.due_date() != after.due_date() {
        changes.push(FieldChange::new(
            TaskField::DueDate,
            before.due_date().to_string(),
            after.due_date().to_string(),
        ));
    }
    if before.assignee() != after.assignee() {
        changes.push(FieldChange::new(
            TaskField::Assignee,
            before.assignee().as_str(),
            after.assignee().as_str(),
        ));
    }
    if before.tags() != after.tags() {
        changes.push(FieldChange::new(TaskField::Tags, before.tags(), after.tags()));
    }
    changes
}
