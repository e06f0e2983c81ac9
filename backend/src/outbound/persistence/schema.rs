//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate with `diesel print-schema` or
//! update by hand.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Normalised (trimmed, lower-cased) address, unique.
        email -> Varchar,
        display_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Work items shown on the board.
    tasks (id) {
        id -> Uuid,
        title -> Varchar,
        description -> Nullable<Text>,
        /// One of `low`, `medium`, `high`.
        priority -> Varchar,
        /// One of `backlog`, `in_progress`, `review`, `done`.
        status -> Varchar,
        /// Set to NULL when the user is deleted.
        assignee_id -> Nullable<Uuid>,
        due_date -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task discussion. Rows cascade with both the task and the author.
    comments (id) {
        id -> Uuid,
        task_id -> Uuid,
        author_id -> Uuid,
        body -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tasks -> users (assignee_id));
diesel::joinable!(comments -> tasks (task_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, tasks, comments);
