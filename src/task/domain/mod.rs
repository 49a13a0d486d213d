//! Domain model for task lifecycle management.
//!
//! The task domain models task creation, status transitions, reassignment,
//! ownership records, and the audit projection while keeping all
//! infrastructure concerns outside of the domain boundary.

mod audit;
mod error;
mod ids;
mod ownership;
mod task;
mod transition;

pub use audit::{TaskWithAudit, TimelineEntry, TimelineEvent};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{LateSubmissionReason, TaskId, TaskTitle};
pub use ownership::{OwnedTask, TaskOwnership};
pub use task::{PersistedTaskData, Task, TaskDraft, TaskStatus};
pub use transition::{ConditionalTransition, Reassignment, StatusChange};
