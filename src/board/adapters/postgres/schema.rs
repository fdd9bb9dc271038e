//! Diesel schema for board persistence.

diesel::table! {
    /// Board projects.
    projects (id) {
        /// Opaque project identifier.
        #[max_length = 100]
        id -> Varchar,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional project manager handle.
        #[max_length = 255]
        project_manager -> Nullable<Varchar>,
        /// Optional notification channel key.
        #[max_length = 100]
        channel_key -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Board tasks.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project.
        #[max_length = 100]
        project_id -> Varchar,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Calendar due date.
        due_date -> Date,
        /// Assignee handle.
        #[max_length = 255]
        assignee -> Varchar,
        /// Free-text tags.
        tags -> Text,
        /// Board status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, tasks);
