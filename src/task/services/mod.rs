//! Application services for task lifecycle orchestration.

mod audit;
mod bulk;
mod lifecycle;

pub use audit::AuditComposer;
pub use bulk::BulkAssignmentService;
pub use lifecycle::{
    CompletionOutcome, CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
