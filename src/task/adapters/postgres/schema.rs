//! Diesel schema for task persistence.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Current assignee.
        assigned_to -> Uuid,
        /// User who made the current assignment.
        assigned_by -> Uuid,
        /// Completing user.
        completed_by -> Nullable<Uuid>,
        /// Owning team.
        team_id -> Uuid,
        /// Optional deadline.
        due_date -> Nullable<Timestamptz>,
        /// Reason given for a late completion.
        late_submission_reason -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest assignment timestamp.
        assigned_at -> Timestamptz,
        /// Start timestamp.
        started_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-delete flag.
        is_deleted -> Bool,
    }
}

diesel::table! {
    /// Immutable task ownership ledger.
    task_ownerships (task_id) {
        /// Owned task.
        task_id -> Uuid,
        /// Creating user.
        creator_user_id -> Uuid,
        /// Creator role at creation time.
        #[max_length = 50]
        creator_role -> Varchar,
        /// Ledger write timestamp.
        created_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, task_ownerships);
