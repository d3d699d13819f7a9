//! Assignment store contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide keyed CRUD over assignment records.
//! - Issue identifiers and answer course/status/date/overdue queries.
//! - Apply the canonical due-date ordering.
//!
//! # Invariants
//! - Identifiers start at 1, increase monotonically and are never reused
//!   until `clear()`. Generation fails rather than wrapping once `u64::MAX`
//!   has been issued or supplied.
//! - Each read observes one consistent snapshot of live records.
//! - Due-date ordering is ascending with undated records last; ties keep
//!   ascending id order.
//! - `update_assignment` never creates a record; `save` always does.

use crate::model::assignment::{now_epoch_ms, Assignment, AssignmentId};
use log::{debug, warn};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// Counter value meaning "nothing issued yet"; the first issued id is 1.
const NO_ASSIGNMENT_ISSUED: AssignmentId = 0;

/// Store-layer result type.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for write operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Every identifier up to `u64::MAX` has been issued or claimed.
    IdSpaceExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdSpaceExhausted => write!(f, "assignment id space exhausted"),
        }
    }
}

impl Error for StoreError {}

/// Query options for combined assignment filtering.
///
/// `None` and empty strings leave that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    /// Exact course match.
    pub course: Option<String>,
    /// Exact, case-sensitive status match.
    pub status: Option<String>,
    /// Inclusive lower due-date bound in epoch milliseconds.
    pub due_from: Option<i64>,
    /// Inclusive upper due-date bound in epoch milliseconds.
    pub due_until: Option<i64>,
}

impl AssignmentFilter {
    /// Returns whether `record` satisfies every provided predicate.
    ///
    /// With any date bound present, undated records never match.
    pub fn matches(&self, record: &Assignment) -> bool {
        if let Some(course) = non_empty(self.course.as_deref()) {
            if record.course.as_deref() != Some(course) {
                return false;
            }
        }
        if let Some(status) = non_empty(self.status.as_deref()) {
            if record.status != status {
                return false;
            }
        }
        if self.due_from.is_none() && self.due_until.is_none() {
            return true;
        }
        let Some(due) = record.due_date else {
            return false;
        };
        self.due_from.map_or(true, |start| due >= start)
            && self.due_until.map_or(true, |end| due <= end)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// Keyed storage contract for assignment records.
///
/// Implementations must be safe for concurrent use through `&self` and
/// must never hand out the same identifier twice.
pub trait AssignmentStore: Send + Sync {
    /// Inserts or replaces `record`, assigning an id when absent.
    ///
    /// Fails with [`StoreError::IdSpaceExhausted`] instead of issuing an id
    /// that is already taken; nothing is written in that case.
    fn save(&self, record: Assignment) -> StoreResult<Assignment>;
    fn find_by_id(&self, id: AssignmentId) -> Option<Assignment>;
    /// All live records, ascending id order.
    fn find_all(&self) -> Vec<Assignment>;
    fn find_by_course(&self, course: &str) -> Vec<Assignment>;
    fn find_by_status(&self, status: &str) -> Vec<Assignment>;
    /// Inclusive on both ends; undated records are excluded.
    fn find_by_due_date_range(&self, start_ms: i64, end_ms: i64) -> Vec<Assignment>;
    /// Dated, due strictly before `now_ms`, and not `completed`.
    fn find_overdue(&self, now_ms: i64) -> Vec<Assignment>;
    fn find_all_sorted_by_due_date(&self) -> Vec<Assignment>;
    /// Conjunction of `filter` predicates in due-date order.
    fn find_with_filters(&self, filter: &AssignmentFilter) -> Vec<Assignment>;
    /// Replaces an existing record; returns `None` without writing when the
    /// id is absent or unknown.
    fn update_assignment(&self, record: Assignment) -> Option<Assignment>;
    fn delete(&self, id: AssignmentId) -> bool;
    /// Drops every record and restarts identifiers at 1.
    fn clear(&self);
    fn count(&self) -> usize;
}

/// Thread-safe in-memory assignment store.
///
/// Records live for the process lifetime only. Returned records are owned
/// copies; changes reach the store only through `save` or
/// `update_assignment`.
#[derive(Debug)]
pub struct InMemoryAssignmentStore {
    records: RwLock<BTreeMap<AssignmentId, Assignment>>,
    /// Highest id issued or supplied so far.
    last_id: AtomicU64,
}

impl InMemoryAssignmentStore {
    /// Creates an empty store whose first issued id is 1.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            last_id: AtomicU64::new(NO_ASSIGNMENT_ISSUED),
        }
    }

    fn issue_id(&self) -> StoreResult<AssignmentId> {
        self.last_id
            .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |last| {
                last.checked_add(1)
            })
            .map(|previous| previous + 1)
            .map_err(|_| StoreError::IdSpaceExhausted)
    }

    fn select(&self, predicate: impl Fn(&Assignment) -> bool) -> Vec<Assignment> {
        self.records
            .read()
            .values()
            .filter(|record| predicate(*record))
            .cloned()
            .collect()
    }
}

impl Default for InMemoryAssignmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn save(&self, mut record: Assignment) -> StoreResult<Assignment> {
        let now = now_epoch_ms();
        let mut records = self.records.write();
        let id = match record.id() {
            Some(id) => {
                if let Some(existing) = records.get(&id) {
                    record.created_at = existing.created_at;
                }
                // Caller-chosen ids must never be issued again.
                self.last_id.fetch_max(id, AtomicOrdering::SeqCst);
                id
            }
            None => {
                let id = match self.issue_id() {
                    Ok(id) => id,
                    Err(err) => {
                        warn!("event=assignment_save module=store status=error error={err}");
                        return Err(err);
                    }
                };
                record.assign_id(id);
                record.created_at = now;
                id
            }
        };
        record.updated_at = now.max(record.created_at);
        records.insert(id, record.clone());
        drop(records);

        debug!("event=assignment_save module=store status=ok id={id}");
        Ok(record)
    }

    fn find_by_id(&self, id: AssignmentId) -> Option<Assignment> {
        self.records.read().get(&id).cloned()
    }

    fn find_all(&self) -> Vec<Assignment> {
        self.records.read().values().cloned().collect()
    }

    fn find_by_course(&self, course: &str) -> Vec<Assignment> {
        self.select(|record| record.course.as_deref() == Some(course))
    }

    fn find_by_status(&self, status: &str) -> Vec<Assignment> {
        self.select(|record| record.status == status)
    }

    fn find_by_due_date_range(&self, start_ms: i64, end_ms: i64) -> Vec<Assignment> {
        self.select(|record| record.is_due_between(start_ms, end_ms))
    }

    fn find_overdue(&self, now_ms: i64) -> Vec<Assignment> {
        self.select(|record| record.is_overdue(now_ms))
    }

    fn find_all_sorted_by_due_date(&self) -> Vec<Assignment> {
        let mut records = self.find_all();
        sort_by_due_date(&mut records);
        records
    }

    fn find_with_filters(&self, filter: &AssignmentFilter) -> Vec<Assignment> {
        let mut records = self.select(|record| filter.matches(record));
        sort_by_due_date(&mut records);
        records
    }

    fn update_assignment(&self, mut record: Assignment) -> Option<Assignment> {
        let id = record.id()?;
        let mut records = self.records.write();
        let slot = records.get_mut(&id)?;
        record.created_at = slot.created_at;
        record.updated_at = now_epoch_ms().max(record.created_at);
        *slot = record.clone();
        drop(records);

        debug!("event=assignment_update module=store status=ok id={id}");
        Some(record)
    }

    fn delete(&self, id: AssignmentId) -> bool {
        let removed = self.records.write().remove(&id).is_some();
        debug!("event=assignment_delete module=store status=ok id={id} removed={removed}");
        removed
    }

    fn clear(&self) {
        let mut records = self.records.write();
        records.clear();
        self.last_id
            .store(NO_ASSIGNMENT_ISSUED, AtomicOrdering::SeqCst);
        drop(records);

        debug!("event=assignment_clear module=store status=ok");
    }

    fn count(&self) -> usize {
        self.records.read().len()
    }
}

/// Sorts ascending by due date with undated records last.
///
/// The sort is stable, so equal keys keep their incoming order.
pub fn sort_by_due_date(records: &mut [Assignment]) {
    records.sort_by(|left, right| compare_due_dates(left.due_date, right.due_date));
}

fn compare_due_dates(left: Option<i64>, right: Option<i64>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
