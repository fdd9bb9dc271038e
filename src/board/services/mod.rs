//! Application services for the task board.

mod lifecycle;
mod project;

pub use lifecycle::{
    CreateTaskRequest, MutationOutcome, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService, UpdateTaskRequest,
};
pub use project::{
    BoardExport, CreateProjectRequest, ProjectService, ProjectServiceError, ProjectServiceResult,
};
