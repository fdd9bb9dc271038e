//! `PostgreSQL` repository implementations for board storage.

use super::{
    models::{ProjectRecord, ProjectRow, TaskRecord, TaskRow},
    schema::{projects, tasks},
};
use crate::board::{
    domain::{
        ChannelKey, DueDate, PersistedProjectData, PersistedTaskData, PersonHandle, Project,
        ProjectId, Task, TaskId, TaskStatus,
    },
    ports::{
        ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult, TaskRepository,
        TaskRepositoryError, TaskRepositoryResult,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

const TASK_NATURAL_KEY_CONSTRAINT: &str = "idx_tasks_project_title_assignee_unique";

/// Runs blocking Diesel work on the blocking thread pool.
async fn run_blocking<F, T, E>(pool: &BoardPgPool, wrap: fn(PoolError) -> E, f: F) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(|err| wrap(PoolError::Checkout(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| wrap(PoolError::Join(err)))?
}

/// Failures acquiring a connection or joining the blocking task.
#[derive(Debug, thiserror::Error)]
enum PoolError {
    #[error("connection checkout failed: {0}")]
    Checkout(#[from] diesel::r2d2::PoolError),
    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: BoardPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let record = to_task_record(task);
        let duplicate = TaskRepositoryError::duplicate_of(task);
        let task_id = task.id();

        run_blocking(&self.pool, TaskRepositoryError::persistence, move |connection| {
            diesel::insert_into(tasks::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_natural_key_violation(info.as_ref()) =>
                    {
                        duplicate.clone()
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTaskId(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskRepositoryResult<()> {
        let record = to_task_record(task);
        let duplicate = TaskRepositoryError::duplicate_of(task);
        let task_id = task.id();

        run_blocking(&self.pool, TaskRepositoryError::persistence, move |connection| {
            let affected = diesel::update(tasks::table.find(task_id.into_inner()))
                .set(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if is_natural_key_violation(info.as_ref()) =>
                    {
                        duplicate.clone()
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: TaskId) -> TaskRepositoryResult<()> {
        run_blocking(&self.pool, TaskRepositoryError::persistence, move |connection| {
            let affected = diesel::delete(tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskRepositoryError::persistence)?;
            if affected == 0 {
                return Err(TaskRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        run_blocking(&self.pool, TaskRepositoryError::persistence, move |connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, project_id: Option<&ProjectId>) -> TaskRepositoryResult<Vec<Task>> {
        let filter = project_id.map(|id| id.as_str().to_owned());
        run_blocking(&self.pool, TaskRepositoryError::persistence, move |connection| {
            let mut query = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(project) = filter {
                query = query.filter(tasks::project_id.eq(project));
            }
            let rows = query
                .order((tasks::due_date.asc(), tasks::title.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn find_due_on(&self, dates: &[DueDate]) -> TaskRepositoryResult<Vec<Task>> {
        let days: Vec<_> = dates.iter().map(|due_date| due_date.date()).collect();
        run_blocking(&self.pool, TaskRepositoryError::persistence, move |connection| {
            let rows = tasks::table
                .filter(tasks::due_date.eq_any(days))
                .select(TaskRow::as_select())
                .order((tasks::due_date.asc(), tasks::title.asc()))
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

/// `PostgreSQL`-backed project repository.
#[derive(Debug, Clone)]
pub struct PostgresProjectRepository {
    pool: BoardPgPool,
}

impl PostgresProjectRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn store(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let record = to_project_record(project);
        let project_id = project.id().clone();
        run_blocking(&self.pool, ProjectRepositoryError::persistence, move |connection| {
            diesel::insert_into(projects::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        ProjectRepositoryError::DuplicateProject(project_id.clone())
                    }
                    _ => ProjectRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectRepositoryResult<()> {
        let record = to_project_record(project);
        let project_id = project.id().clone();
        run_blocking(&self.pool, ProjectRepositoryError::persistence, move |connection| {
            let affected = diesel::update(projects::table.find(project_id.as_str()))
                .set(&record)
                .execute(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            if affected == 0 {
                return Err(ProjectRepositoryError::NotFound(project_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: &ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let lookup_id = id.as_str().to_owned();
        run_blocking(&self.pool, ProjectRepositoryError::persistence, move |connection| {
            let row = projects::table
                .find(lookup_id)
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectRepositoryError::persistence)?;
            row.map(row_to_project).transpose()
        })
        .await
    }

    async fn list(&self) -> ProjectRepositoryResult<Vec<Project>> {
        run_blocking(&self.pool, ProjectRepositoryError::persistence, move |connection| {
            let rows = projects::table
                .select(ProjectRow::as_select())
                .order((projects::name.asc(), projects::id.asc()))
                .load::<ProjectRow>(connection)
                .map_err(ProjectRepositoryError::persistence)?;
            rows.into_iter().map(row_to_project).collect()
        })
        .await
    }
}

fn to_task_record(task: &Task) -> TaskRecord {
    TaskRecord {
        id: task.id().into_inner(),
        project_id: task.project_id().as_str().to_owned(),
        title: task.title().to_owned(),
        due_date: task.due_date().date(),
        assignee: task.assignee().as_str().to_owned(),
        tags: task.tags().to_owned(),
        status: task.status().as_str().to_owned(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        title,
        due_date,
        assignee,
        tags,
        status,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        project_id: ProjectId::new(project_id).map_err(TaskRepositoryError::persistence)?,
        title,
        due_date: DueDate::from_date(due_date),
        assignee: PersonHandle::new(assignee, "assignee")
            .map_err(TaskRepositoryError::persistence)?,
        tags,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn to_project_record(project: &Project) -> ProjectRecord {
    ProjectRecord {
        id: project.id().as_str().to_owned(),
        name: project.name().to_owned(),
        project_manager: project.manager().map(|manager| manager.as_str().to_owned()),
        channel_key: project.channel_key().map(|key| key.as_str().to_owned()),
        created_at: project.created_at(),
    }
}

fn row_to_project(row: ProjectRow) -> ProjectRepositoryResult<Project> {
    let ProjectRow {
        id,
        name,
        project_manager,
        channel_key,
        created_at,
    } = row;

    // Blank managers count as unset.
    let manager = project_manager
        .filter(|handle| !handle.trim().is_empty())
        .map(|handle| PersonHandle::new(handle, "project manager"))
        .transpose()
        .map_err(ProjectRepositoryError::persistence)?;
    let channel_key = channel_key
        .map(ChannelKey::new)
        .transpose()
        .map_err(ProjectRepositoryError::persistence)?;

    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::new(id).map_err(ProjectRepositoryError::persistence)?,
        name,
        manager,
        channel_key,
        created_at,
    }))
}

fn is_natural_key_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == TASK_NATURAL_KEY_CONSTRAINT)
}
