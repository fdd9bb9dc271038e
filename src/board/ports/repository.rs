//! Repository port for task persistence and lookup.

use crate::board::domain::{DueDate, PersonHandle, ProjectId, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when a task with the
    /// same title and assignee already exists in the project.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// or [`TaskRepositoryError::DuplicateTask`] when the change collides
    /// with another task's title and assignee.
    async fn update(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes a task permanently.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Lists tasks ordered by due date then title, optionally restricted to
    /// one project.
    async fn list(&self, project_id: Option<&ProjectId>) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns every task whose due date falls on one of the given days.
    async fn find_due_on(&self, dates: &[DueDate]) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same title and assignee exists in the project.
    #[error("task '{title}' assigned to {assignee} already exists in project {project_id}")]
    DuplicateTask {
        /// Owning project.
        project_id: ProjectId,
        /// Conflicting title.
        title: String,
        /// Conflicting assignee.
        assignee: PersonHandle,
    },

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTaskId(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Builds the duplicate-task error for the given task.
    #[must_use]
    pub fn duplicate_of(task: &Task) -> Self {
        Self::DuplicateTask {
            project_id: task.project_id().clone(),
            title: task.title().to_owned(),
            assignee: task.assignee().clone(),
        }
    }
}
