//! Ownership-based authorization for destructive operations.
//!
//! Decisions are made by the pure [`authorize`] function over explicit
//! inputs: the operation, the caller, and the ownership evidence loaded for
//! the target. [`AuthorizationGate`] only loads that evidence from the task
//! and team repositories.
//!
//! The rules differ per resource:
//!
//! - a team may be deleted by the user who created it, whatever that user's
//!   role is now;
//! - a task may be deleted only by an administrator who created it while
//!   holding the administrator role.
//!
//! Rows that predate the ownership ledger fall back to the team's
//! `owner_id` or the task's `assigned_by`.

mod error;
mod gate;
mod policy;

pub use error::{AuthorizationError, AuthorizationResult};
pub use gate::AuthorizationGate;
pub use policy::{Decision, DenialReason, Operation, OwnershipEvidence, authorize, precheck};
