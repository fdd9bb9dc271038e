//! In-memory adapters for the task board.

mod project;
mod task;

pub use project::InMemoryProjectRepository;
pub use task::InMemoryTaskRepository;
