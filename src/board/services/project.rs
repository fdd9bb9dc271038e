//! Project administration and board export.

use crate::board::{
    domain::{ChannelKey, PersonHandle, Project, ProjectId, Task, TaskDomainError},
    ports::{ProjectRepository, ProjectRepositoryError, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    id: Option<String>,
    name: String,
    manager: Option<String>,
    channel_key: Option<String>,
}

impl CreateProjectRequest {
    /// Creates a request for a project called `name` with a generated id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            manager: None,
            channel_key: None,
        }
    }

    /// Uses an explicit project identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the project manager.
    #[must_use]
    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = Some(manager.into());
        self
    }

    /// Sets the notification channel key.
    #[must_use]
    pub fn with_channel_key(mut self, channel_key: impl Into<String>) -> Self {
        self.channel_key = Some(channel_key.into());
        self
    }
}

/// One project with its tasks, as written by the board export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardExport {
    /// The project.
    #[serde(flatten)]
    pub project: Project,
    /// Its tasks ordered by due date.
    pub tasks: Vec<Task>,
}

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Input validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Project persistence failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Task lookup failed during export.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
    /// The project does not exist.
    #[error("project not found: {0}")]
    NotFound(ProjectId),
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project creation, manager assignment and export.
#[derive(Clone)]
pub struct ProjectService<P, R, C>
where
    P: ProjectRepository,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<R>,
    clock: Arc<C>,
}

impl<P, R, C> ProjectService<P, R, C>
where
    P: ProjectRepository,
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(projects: Arc<P>, tasks: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            projects,
            tasks,
            clock,
        }
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] for invalid input or
    /// [`ProjectServiceError::Repository`] when the id is taken or
    /// persistence fails.
    pub async fn create_project(
        &self,
        request: CreateProjectRequest,
    ) -> ProjectServiceResult<Project> {
        let CreateProjectRequest {
            id,
            name,
            manager,
            channel_key,
        } = request;

        let project_id = id.map_or_else(|| Ok(ProjectId::generate()), ProjectId::new)?;
        let mut project = Project::new(project_id, name, &*self.clock)?;
        if let Some(raw_manager) = manager.filter(|value| !value.trim().is_empty()) {
            project = project.with_manager(PersonHandle::new(raw_manager, "manager")?);
        }
        if let Some(raw_key) = channel_key.filter(|value| !value.trim().is_empty()) {
            project = project.with_channel_key(ChannelKey::new(raw_key)?);
        }

        self.projects.store(&project).await?;
        info!(project_id = %project.id(), name = project.name(), "project created");
        Ok(project)
    }

    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, id: &ProjectId) -> ProjectServiceResult<Option<Project>> {
        Ok(self.projects.find_by_id(id).await?)
    }

    /// Lists projects ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Repository`] when lookup fails.
    pub async fn list_projects(&self) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.projects.list().await?)
    }

    /// Replaces the manager of a project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::Domain`] when the handle is blank,
    /// [`ProjectServiceError::NotFound`] when the project does not exist, or
    /// [`ProjectServiceError::Repository`] when persistence fails.
    pub async fn assign_manager(
        &self,
        id: &ProjectId,
        manager: &str,
    ) -> ProjectServiceResult<Project> {
        let handle = PersonHandle::new(manager, "manager")?;
        let mut project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| ProjectServiceError::NotFound(id.clone()))?;
        project.assign_manager(handle);
        self.projects.update(&project).await?;
        Ok(project)
    }

    /// Returns every project with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError`] when projects or tasks cannot be
    /// loaded.
    pub async fn export_board(&self) -> ProjectServiceResult<Vec<BoardExport>> {
        let projects = self.projects.list().await?;
        let mut export = Vec::with_capacity(projects.len());
        for project in projects {
            let tasks = self.tasks.list(Some(project.id())).await?;
            export.push(BoardExport { project, tasks });
        }
        Ok(export)
    }
}
