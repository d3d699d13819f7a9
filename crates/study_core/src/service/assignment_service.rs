//! Assignment use-case service.
//!
//! # Responsibility
//! - Validate creation and status-update input.
//! - Delegate storage and queries to an `AssignmentStore`.
//! - Report failures as values carrying a stable human-readable message.
//!
//! # Invariants
//! - Rejected operations leave the store untouched.
//! - Created assignments always start in status `todo` with a trimmed title.
//! - The service keeps no mutable state of its own.

use crate::model::assignment::{
    now_epoch_ms, Assignment, AssignmentId, AssignmentSummary, STATUS_TODO,
};
use crate::repo::assignment_store::{AssignmentFilter, AssignmentStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const TITLE_REQUIRED_MESSAGE: &str = "Assignment title is required.";
pub const DUE_DATE_REQUIRED_MESSAGE: &str = "Due date is required.";
pub const ID_REQUIRED_MESSAGE: &str = "Assignment ID cannot be null.";
pub const STATUS_REQUIRED_MESSAGE: &str = "Status cannot be empty.";
pub const NOT_FOUND_MESSAGE: &str = "Assignment not found.";
pub const STATUS_UPDATED_MESSAGE: &str = "Assignment status updated successfully.";
pub const STORAGE_FULL_MESSAGE: &str = "No more assignments can be stored.";

pub type ServiceResult<T> = Result<T, AssignmentServiceError>;

/// Coarse failure category for callers mapping errors onto a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorKind {
    Validation,
    NotFound,
    Storage,
}

/// Service error for assignment use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentServiceError {
    /// Caller input violates a presence precondition.
    Validation(&'static str),
    /// Referenced assignment has no live record.
    NotFound(&'static str),
    /// Store refused the write.
    Storage(StoreError),
}

impl AssignmentServiceError {
    pub fn kind(&self) -> ServiceErrorKind {
        match self {
            Self::Validation(_) => ServiceErrorKind::Validation,
            Self::NotFound(_) => ServiceErrorKind::NotFound,
            Self::Storage(_) => ServiceErrorKind::Storage,
        }
    }

    /// Message intended to be shown to users verbatim.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Validation(message) | Self::NotFound(message) => *message,
            Self::Storage(StoreError::IdSpaceExhausted) => STORAGE_FULL_MESSAGE,
        }
    }
}

impl Display for AssignmentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for AssignmentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Validation(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<StoreError> for AssignmentServiceError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Request model for creating an assignment.
///
/// `title` and `due_date` are optional here so absent input can be reported
/// as a validation failure instead of being unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub course: Option<String>,
    /// Due date in epoch milliseconds.
    pub due_date: Option<i64>,
    pub priority: Option<String>,
    pub estimated_hours: Option<u32>,
}

/// Assignment service facade over store implementations.
pub struct AssignmentService<S: AssignmentStore> {
    store: S,
}

impl<S: AssignmentStore> AssignmentService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and persists a new assignment in status `todo`.
    ///
    /// # Errors
    /// - `Validation(TITLE_REQUIRED_MESSAGE)` for a missing or blank title.
    /// - `Validation(DUE_DATE_REQUIRED_MESSAGE)` for a missing due date.
    /// - `Storage` when the store can no longer issue identifiers.
    pub fn create_assignment(&self, request: NewAssignment) -> ServiceResult<Assignment> {
        let title = match request.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => return Err(reject("create", TITLE_REQUIRED_MESSAGE)),
        };
        let Some(due_date) = request.due_date else {
            return Err(reject("create", DUE_DATE_REQUIRED_MESSAGE));
        };

        let mut assignment = Assignment::new(title);
        assignment.description = request.description;
        assignment.course = request.course;
        assignment.due_date = Some(due_date);
        assignment.status = STATUS_TODO.to_string();
        assignment.priority = request.priority;
        assignment.estimated_hours = request.estimated_hours;

        let saved = self.store.save(assignment)?;
        info!(
            "event=assignment_create module=service status=ok id={}",
            saved.id().unwrap_or_default()
        );
        Ok(saved)
    }

    /// Lists every assignment in due-date order, undated last.
    pub fn get_all_assignments(&self) -> Vec<Assignment> {
        self.store.find_all_sorted_by_due_date()
    }

    /// Lists assignments matching every provided filter, in due-date order.
    pub fn get_assignments_with_filters(&self, filter: &AssignmentFilter) -> Vec<Assignment> {
        self.store.find_with_filters(filter)
    }

    /// Replaces the status of an existing assignment with the trimmed value.
    ///
    /// Checks run in order: id presence, status presence, existence.
    pub fn update_assignment_status(
        &self,
        id: Option<AssignmentId>,
        new_status: Option<&str>,
    ) -> ServiceResult<&'static str> {
        let Some(id) = id else {
            return Err(reject("update_status", ID_REQUIRED_MESSAGE));
        };
        let status = match new_status.map(str::trim) {
            Some(status) if !status.is_empty() => status,
            _ => return Err(reject("update_status", STATUS_REQUIRED_MESSAGE)),
        };

        let Some(mut assignment) = self.store.find_by_id(id) else {
            warn!("event=assignment_update_status module=service status=error id={id} error_code=not_found");
            return Err(AssignmentServiceError::NotFound(NOT_FOUND_MESSAGE));
        };
        assignment.set_status(status);

        // Deleted between lookup and write.
        if self.store.update_assignment(assignment).is_none() {
            warn!("event=assignment_update_status module=service status=error id={id} error_code=not_found");
            return Err(AssignmentServiceError::NotFound(NOT_FOUND_MESSAGE));
        }

        info!("event=assignment_update_status module=service status=ok id={id}");
        Ok(STATUS_UPDATED_MESSAGE)
    }

    pub fn get_assignment_by_id(&self, id: AssignmentId) -> Option<Assignment> {
        self.store.find_by_id(id)
    }

    /// Lists assignments overdue at call time.
    pub fn get_overdue_assignments(&self) -> Vec<Assignment> {
        self.store.find_overdue(now_epoch_ms())
    }

    /// Lists assignments due between now and `now + window`, inclusive.
    pub fn get_assignments_due_within(&self, window: Duration) -> Vec<Assignment> {
        let now = now_epoch_ms();
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);
        let filter = AssignmentFilter {
            due_from: Some(now),
            due_until: Some(now.saturating_add(window_ms)),
            ..AssignmentFilter::default()
        };
        self.store.find_with_filters(&filter)
    }

    pub fn get_total_assignments_count(&self) -> usize {
        self.store.count()
    }

    /// Counts assignments whose status matches exactly (case-sensitive).
    pub fn get_assignments_count_by_status(&self, status: &str) -> usize {
        self.store.find_by_status(status).len()
    }

    /// Tallies one snapshot by well-known status, overdue state and
    /// estimated hours.
    pub fn get_assignment_summary(&self) -> AssignmentSummary {
        let records = self.store.find_all();
        AssignmentSummary::from_records(&records, now_epoch_ms())
    }

    /// Same tallies restricted to the records `filter` selects.
    pub fn get_assignment_summary_with_filters(
        &self,
        filter: &AssignmentFilter,
    ) -> AssignmentSummary {
        let records = self.store.find_with_filters(filter);
        AssignmentSummary::from_records(&records, now_epoch_ms())
    }
}

fn reject(operation: &str, message: &'static str) -> AssignmentServiceError {
    warn!(
        "event=assignment_{operation} module=service status=error error_code=validation reason=\"{message}\""
    );
    AssignmentServiceError::Validation(message)
}
