//! Core domain logic for the study assignment tracker.
//! This crate is the single source of truth for assignment invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use logging::{
    default_log_level, init_logging, init_logging_with_config, logging_status, LoggingError,
};
pub use model::assignment::{
    now_epoch_ms, Assignment, AssignmentId, AssignmentSummary, STATUS_COMPLETED,
    STATUS_IN_PROGRESS, STATUS_TODO,
};
pub use repo::assignment_store::{
    sort_by_due_date, AssignmentFilter, AssignmentStore, InMemoryAssignmentStore, StoreError,
    StoreResult,
};
pub use service::assignment_service::{
    AssignmentService, AssignmentServiceError, NewAssignment, ServiceErrorKind, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
