//! Assignment domain model.
//!
//! # Responsibility
//! - Define the record tracked for one academic assignment.
//! - Provide status/overdue helpers that do not depend on storage.
//!
//! # Invariants
//! - `id` is `None` until the first store save and immutable afterwards.
//! - `created_at <= updated_at` for every record written by a store.
//! - Equality and hashing consider `id` only.
//! - A record without `due_date` is never overdue.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-issued identifier, monotonically increasing from 1.
pub type AssignmentId = u64;

/// Initial status of every created assignment.
pub const STATUS_TODO: &str = "todo";
/// Conventional status for started work.
pub const STATUS_IN_PROGRESS: &str = "in-progress";
/// Terminal status; excludes a record from the overdue set.
pub const STATUS_COMPLETED: &str = "completed";

/// Returns current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before the epoch collapse to `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

/// One tracked assignment.
///
/// `status` is free text; only [`STATUS_COMPLETED`] carries behavior.
/// `priority` and `estimated_hours` are opaque caller metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned by the store on first save; read through [`Assignment::id`].
    id: Option<AssignmentId>,
    pub title: String,
    pub description: Option<String>,
    /// Exact-match filter key.
    pub course: Option<String>,
    /// Unix epoch milliseconds. Absence is a permanent, valid state.
    pub due_date: Option<i64>,
    pub status: String,
    pub priority: Option<String>,
    pub estimated_hours: Option<u32>,
    /// Unix epoch milliseconds, set once at first save.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed on every store write.
    pub updated_at: i64,
}

impl Assignment {
    /// Creates an unsaved record with status `todo` and no optional fields.
    pub fn new(title: impl Into<String>) -> Self {
        Self::build(None, title.into())
    }

    /// Creates a record carrying a caller-provided identity.
    ///
    /// Used by import paths where the id already exists; a store saving it
    /// replaces any record under the same id.
    pub fn with_id(id: AssignmentId, title: impl Into<String>) -> Self {
        Self::build(Some(id), title.into())
    }

    fn build(id: Option<AssignmentId>, title: String) -> Self {
        let now = now_epoch_ms();
        Self {
            id,
            title,
            description: None,
            course: None,
            due_date: None,
            status: STATUS_TODO.to_string(),
            priority: None,
            estimated_hours: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Store-issued identity, `None` before the first save.
    pub fn id(&self) -> Option<AssignmentId> {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: AssignmentId) {
        self.id = Some(id);
    }

    /// Replaces the status and refreshes `updated_at`.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.updated_at = now_epoch_ms().max(self.created_at);
    }

    /// Returns whether `status` is exactly `completed`.
    pub fn is_completed(&self) -> bool {
        self.status == STATUS_COMPLETED
    }

    /// Overdue means a present due date strictly before `now_ms` and a
    /// status other than `completed`.
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        match self.due_date {
            Some(due) => due < now_ms && !self.is_completed(),
            None => false,
        }
    }

    /// Inclusive on both ends; records without a due date never match.
    pub fn is_due_between(&self, start_ms: i64, end_ms: i64) -> bool {
        self.due_date
            .is_some_and(|due| due >= start_ms && due <= end_ms)
    }
}

impl PartialEq for Assignment {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Assignment {}

impl Hash for Assignment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Assignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{id}")?,
            None => write!(f, "#-")?,
        }
        write!(f, " [{}] {}", self.status, self.title)?;
        if let Some(course) = self.course.as_deref() {
            write!(f, " ({course})")?;
        }
        match self.due_date {
            Some(due) => write!(f, " due={due}"),
            None => write!(f, " due=none"),
        }
    }
}

/// Status tallies derived from one snapshot of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSummary {
    pub total: usize,
    pub todo: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Records overdue at the snapshot time.
    pub overdue: usize,
    /// Sum of `estimated_hours`, missing values counted as zero.
    pub total_estimated_hours: u64,
}

impl AssignmentSummary {
    /// Tallies `records` against the overdue cutoff `now_ms`.
    ///
    /// Statuses outside the three well-known values only count toward
    /// `total` (and `overdue` when applicable).
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a Assignment>, now_ms: i64) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.total += 1;
            match record.status.as_str() {
                STATUS_TODO => summary.todo += 1,
                STATUS_IN_PROGRESS => summary.in_progress += 1,
                STATUS_COMPLETED => summary.completed += 1,
                _ => {}
            }
            if record.is_overdue(now_ms) {
                summary.overdue += 1;
            }
            summary.total_estimated_hours += u64::from(record.estimated_hours.unwrap_or(0));
        }
        summary
    }
}
