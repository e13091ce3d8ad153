//! Diesel schema for workflow persistence.

diesel::table! {
    /// Per-project task status catalog.
    project_task_statuses (id) {
        /// Status identifier.
        id -> Uuid,
        /// Owning project identifier.
        project_id -> Uuid,
        /// Display name.
        #[max_length = 100]
        name -> Varchar,
        /// Display color in `#rrggbb` form.
        #[max_length = 7]
        color -> Varchar,
        /// Pipeline position, constrained to the signed 8-bit range.
        status_order -> Nullable<Int2>,
        /// Whether entering the status completes the task.
        should_set_task_to_completed -> Bool,
        /// Whether new tasks start in the status.
        is_default -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete timestamp.
        deleted_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Status-relevant task columns.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning organization identifier.
        organization_id -> Uuid,
        /// Owning project identifier.
        project_id -> Uuid,
        /// Current status identifier.
        status_id -> Uuid,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Last editing user.
        last_edited_by -> Nullable<Uuid>,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
