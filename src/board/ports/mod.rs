//! Port contracts for the task board.
//!
//! Ports define infrastructure-agnostic interfaces used by board and
//! notification services.

pub mod project_repository;
pub mod repository;

pub use project_repository::{
    ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult,
};
pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
