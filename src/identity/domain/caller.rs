//! Authenticated caller identity.

use super::{Role, UserId};

/// Identity and role of the authenticated caller, as supplied by the token
/// verification layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Caller {
    user_id: UserId,
    role: Role,
}

impl Caller {
    /// Creates a caller from a verified identity.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Creates an administrator caller.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin)
    }

    /// Creates a member caller.
    #[must_use]
    pub const fn member(user_id: UserId) -> Self {
        Self::new(user_id, Role::Member)
    }

    /// Returns the caller's user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the caller's current role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}
