//! Diesel schema for the collaborator-owned users table.

diesel::table! {
    /// User accounts maintained by the authentication service.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Contact email.
        #[max_length = 255]
        email -> Nullable<Varchar>,
        /// Current role.
        #[max_length = 50]
        role -> Varchar,
    }
}
