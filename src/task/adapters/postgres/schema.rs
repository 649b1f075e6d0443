//! Diesel schema for task persistence.

diesel::table! {
    /// Task records with numbering and lifecycle columns.
    tasks (id) {
        /// Surrogate task identifier.
        id -> BigInt,
        /// Compact task number; null while archived. A partial unique
        /// index (`idx_tasks_active_number_unique`) enforces uniqueness
        /// among non-archived rows.
        task_number -> Nullable<Integer>,
        /// Task title.
        #[max_length = 300]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Urgency level.
        #[max_length = 10]
        priority -> Varchar,
        /// Optional assignee reference.
        assigned_to -> Nullable<BigInt>,
        /// Creating user reference.
        created_by -> BigInt,
        /// Completion timestamp, set while the task is `done`.
        completed_at -> Nullable<Timestamptz>,
        /// Archival timestamp, set while the task is `archived`.
        archived_at -> Nullable<Timestamptz>,
        /// Creation timestamp (possibly backdated by import).
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
