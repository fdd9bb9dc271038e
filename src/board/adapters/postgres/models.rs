//! Diesel row models for board persistence.

use super::schema::{projects, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: String,
    /// Task title.
    pub title: String,
    /// Calendar due date.
    pub due_date: NaiveDate,
    /// Assignee handle.
    pub assignee: String,
    /// Free-text tags.
    pub tags: String,
    /// Board status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and update model for task records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskRecord {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: String,
    /// Task title.
    pub title: String,
    /// Calendar due date.
    pub due_date: NaiveDate,
    /// Assignee handle.
    pub assignee: String,
    /// Free-text tags.
    pub tags: String,
    /// Board status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for project records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Opaque project identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional manager handle.
    pub project_manager: Option<String>,
    /// Optional channel key.
    pub channel_key: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert and update model for project records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = projects)]
#[diesel(treat_none_as_null = true)]
pub struct ProjectRecord {
    /// Opaque project identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional manager handle.
    pub project_manager: Option<String>,
    /// Optional channel key.
    pub channel_key: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
