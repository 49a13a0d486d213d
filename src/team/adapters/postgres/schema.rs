//! Diesel schema for team persistence.

diesel::table! {
    /// Team records.
    teams (id) {
        /// Team identifier.
        id -> Uuid,
        /// Team name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional description.
        description -> Nullable<Text>,
        /// Owner column used when no ownership record exists.
        owner_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Immutable team ownership ledger.
    team_ownerships (team_id) {
        /// Owned team.
        team_id -> Uuid,
        /// Creating user.
        creator_user_id -> Uuid,
        /// Creator role at creation time.
        #[max_length = 50]
        creator_role -> Varchar,
        /// Ledger write timestamp.
        created_at -> Timestamptz,
    }
}
