//! Domain model for the task board.
//!
//! Projects own tasks; tasks move freely between board columns. The domain
//! performs validation only and keeps persistence and notification concerns
//! outside its boundary.

mod due_date;
mod error;
mod ids;
mod project;
mod task;

pub use due_date::DueDate;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{ChannelKey, PersonHandle, ProjectId, TaskId};
pub use project::{PersistedProjectData, Project};
pub use task::{NewTask, PersistedTaskData, Task, TaskPatch, TaskStatus};
