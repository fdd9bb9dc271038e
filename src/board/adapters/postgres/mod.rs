//! `PostgreSQL` adapters for board persistence.

mod models;
mod repository;
mod schema;

pub use repository::{BoardPgPool, PostgresProjectRepository, PostgresTaskRepository};
