//! Task lifecycle service.
//!
//! Provides [`TaskLifecycleService`], which validates input, commits task
//! mutations to the repository and then hands the committed change to the
//! notification orchestrator. Notification outcomes are reported alongside
//! the task and never fail the mutation.

use crate::board::{
    domain::{
        DueDate, NewTask, ParseTaskStatusError, PersonHandle, Project, ProjectId, Task,
        TaskDomainError, TaskId, TaskPatch, TaskStatus,
    },
    ports::{ProjectRepository, ProjectRepositoryError, TaskRepository, TaskRepositoryError},
};
use crate::notification::{
    domain::TaskMutation,
    ports::MessageDispatcher,
    services::{NotificationOrchestrator, NotificationReport},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: String,
    title: String,
    due_date: String,
    assignee: String,
    tags: String,
    status: Option<String>,
}

impl CreateTaskRequest {
    /// Creates a request with the mandatory task fields.
    #[must_use]
    pub fn new(
        project_id: impl Into<String>,
        title: impl Into<String>,
        due_date: impl Into<String>,
        assignee: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            due_date: due_date.into(),
            assignee: assignee.into(),
            tags: String::new(),
            status: None,
        }
    }

    /// Sets free-text tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    /// Sets the initial status; the service default applies otherwise.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    task_id: TaskId,
    title: Option<String>,
    due_date: Option<String>,
    assignee: Option<String>,
    tags: Option<String>,
    status: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates an update for `task_id` that changes nothing yet.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            title: None,
            due_date: None,
            assignee: None,
            tags: None,
            status: None,
        }
    }

    /// Sets a new title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a new due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets a new assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets new tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = Some(tags.into());
        self
    }

    /// Sets a new status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    fn into_patch(self) -> TaskLifecycleResult<(TaskId, TaskPatch)> {
        let Self {
            task_id,
            title,
            due_date,
            assignee,
            tags,
            status,
        } = self;

        let mut patch = TaskPatch::new();
        if let Some(raw_title) = title {
            patch = patch.with_title(&raw_title)?;
        }
        if let Some(raw_due_date) = due_date {
            patch = patch.with_due_date(DueDate::parse(&raw_due_date)?);
        }
        if let Some(raw_assignee) = assignee {
            patch = patch.with_assignee(PersonHandle::new(raw_assignee, "assignee")?);
        }
        if let Some(raw_tags) = tags {
            patch = patch.with_tags(&raw_tags);
        }
        if let Some(raw_status) = status {
            patch = patch.with_status(TaskStatus::try_from(raw_status.as_str())?);
        }
        if patch.is_empty() {
            return Err(TaskDomainError::EmptyUpdate.into());
        }
        Ok((task_id, patch))
    }
}

/// A committed task mutation and the notifications it produced.
#[derive(Debug, Clone)]
pub struct MutationOutcome {
    /// Task state after the mutation, or the removed task for deletions.
    pub task: Task,
    /// Per-intent delivery outcomes.
    pub notifications: NotificationReport,
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The status value is unknown.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// Task persistence failed or rejected the change.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Project lookup failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The referenced project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),
}

/// Result type for task lifecycle operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Creates, updates and deletes tasks, notifying after each commit.
#[derive(Clone)]
pub struct TaskLifecycleService<R, P, D, C>
where
    R: TaskRepository,
    P: ProjectRepository,
    D: MessageDispatcher,
    C: Clock + Send + Sync,
{
    tasks: Arc<R>,
    projects: Arc<P>,
    notifier: Arc<NotificationOrchestrator<D>>,
    clock: Arc<C>,
    default_status: TaskStatus,
}

impl<R, P, D, C> TaskLifecycleService<R, P, D, C>
where
    R: TaskRepository,
    P: ProjectRepository,
    D: MessageDispatcher,
    C: Clock + Send + Sync,
{
    /// Creates a service whose new tasks default to `IN_PROGRESS`.
    #[must_use]
    pub const fn new(
        tasks: Arc<R>,
        projects: Arc<P>,
        notifier: Arc<NotificationOrchestrator<D>>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            projects,
            notifier,
            clock,
            default_status: TaskStatus::InProgress,
        }
    }

    /// Overrides the status given to tasks created without one.
    #[must_use]
    pub const fn with_default_status(mut self, status: TaskStatus) -> Self {
        self.default_status = status;
        self
    }

    /// Returns the status given to tasks created without one.
    #[must_use]
    pub const fn default_status(&self) -> TaskStatus {
        self.default_status
    }

    /// Creates a task and notifies about it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] or
    /// [`TaskLifecycleError::InvalidStatus`] for invalid input,
    /// [`TaskLifecycleError::ProjectNotFound`] when the project does not
    /// exist, or [`TaskLifecycleError::Repository`] when the task duplicates
    /// an existing one or persistence fails.
    pub async fn create_task(
        &self,
        request: CreateTaskRequest,
    ) -> TaskLifecycleResult<MutationOutcome> {
        let CreateTaskRequest {
            project_id: raw_project_id,
            title,
            due_date,
            assignee,
            tags,
            status,
        } = request;

        let new_task = NewTask {
            project_id: ProjectId::new(raw_project_id)?,
            title,
            due_date: DueDate::parse(&due_date)?,
            assignee: PersonHandle::new(assignee, "assignee")?,
            tags,
            status: status
                .as_deref()
                .map(TaskStatus::try_from)
                .transpose()?
                .unwrap_or(self.default_status),
        };
        let task = Task::new(new_task, &*self.clock)?;

        let project = self
            .projects
            .find_by_id(task.project_id())
            .await?
            .ok_or_else(|| TaskLifecycleError::ProjectNotFound(task.project_id().clone()))?;

        self.tasks.store(&task).await?;
        info!(
            task_id = %task.id(),
            project_id = %project.id(),
            status = %task.status(),
            "task created"
        );

        let notifications = self
            .notifier
            .on_mutation(&project, TaskMutation::Created(&task))
            .await;
        Ok(MutationOutcome {
            task,
            notifications,
        })
    }

    /// Applies a partial update and notifies about the change.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] for invalid or empty input,
    /// [`TaskLifecycleError::TaskNotFound`] when the task does not exist, or
    /// [`TaskLifecycleError::Repository`] when persistence rejects the change.
    pub async fn update_task(
        &self,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<MutationOutcome> {
        let (task_id, patch) = request.into_patch()?;
        let before = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))?;

        let mut after = before.clone();
        after.apply(patch, &*self.clock)?;
        self.tasks.update(&after).await?;
        info!(task_id = %task_id, from = %before.status(), to = %after.status(), "task updated");

        let notifications = match self.owning_project(&after).await {
            Some(project) => {
                self.notifier
                    .on_mutation(
                        &project,
                        TaskMutation::Updated {
                            before: &before,
                            after: &after,
                        },
                    )
                    .await
            }
            None => NotificationReport::new(),
        };
        Ok(MutationOutcome {
            task: after,
            notifications,
        })
    }

    /// Deletes a task and notifies using its last-known state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task does not
    /// exist or [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn delete_task(&self, task_id: TaskId) -> TaskLifecycleResult<MutationOutcome> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))?;

        self.tasks.delete(task_id).await?;
        info!(task_id = %task_id, project_id = %task.project_id(), "task deleted");

        let notifications = match self.owning_project(&task).await {
            Some(project) => {
                self.notifier
                    .on_mutation(&project, TaskMutation::Deleted(&task))
                    .await
            }
            None => NotificationReport::new(),
        };
        Ok(MutationOutcome {
            task,
            notifications,
        })
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.tasks.find_by_id(task_id).await?)
    }

    /// Lists tasks by due date, optionally for one project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list_tasks(
        &self,
        project_id: Option<&ProjectId>,
    ) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list(project_id).await?)
    }

    /// Looks up the project to notify for a committed change.
    ///
    /// The mutation is already stored, so lookup failures only cost the
    /// notification.
    async fn owning_project(&self, task: &Task) -> Option<Project> {
        match self.projects.find_by_id(task.project_id()).await {
            Ok(Some(project)) => Some(project),
            Ok(None) => {
                warn!(
                    task_id = %task.id(),
                    project_id = %task.project_id(),
                    "task references a missing project, skipping notification"
                );
                None
            }
            Err(err) => {
                warn!(
                    task_id = %task.id(),
                    project_id = %task.project_id(),
                    error = %err,
                    "project lookup failed after commit, skipping notification"
                );
                None
            }
        }
    }
}
