//! In-memory task repository for tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{DueDate, ProjectId, Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

/// Uniqueness key: project, title, assignee.
type NaturalKey = (String, String, String);

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    natural_index: HashMap<NaturalKey, TaskId>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn natural_key(task: &Task) -> NaturalKey {
    (
        task.project_id().as_str().to_owned(),
        task.title().to_owned(),
        task.assignee().as_str().to_owned(),
    )
}

fn sorted_by_due_date(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|left, right| {
        left.due_date()
            .cmp(&right.due_date())
            .then_with(|| left.title().cmp(right.title()))
    });
    tasks
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskRepositoryError::DuplicateTaskId(task.id()));
        }

        let key = natural_key(task);
        if state.natural_index.contains_key(&key) {
            return Err(TaskRepositoryError::duplicate_of(task));
        }

        state.natural_index.insert(key, task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let old_key = state
            .tasks
            .get(&task.id())
            .map(natural_key)
            .ok_or(TaskRepositoryError::NotFound(task.id()))?;

        let new_key = natural_key(task);
        if state
            .natural_index
            .get(&new_key)
            .is_some_and(|owner| *owner != task.id())
        {
            return Err(TaskRepositoryError::duplicate_of(task));
        }

        state.natural_index.remove(&old_key);
        state.natural_index.insert(new_key, task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let removed = state
            .tasks
            .remove(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        state.natural_index.remove(&natural_key(&removed));
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, project_id: Option<&ProjectId>) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| project_id.is_none_or(|id| task.project_id() == id))
            .cloned()
            .collect();
        Ok(sorted_by_due_date(tasks))
    }

    async fn find_due_on(&self, dates: &[DueDate]) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let tasks = state
            .tasks
            .values()
            .filter(|task| dates.contains(&task.due_date()))
            .cloned()
            .collect();
        Ok(sorted_by_due_date(tasks))
    }
}
