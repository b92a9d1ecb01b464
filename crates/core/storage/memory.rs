//! In-memory snapshot collection.

use super::{SnapshotStore, StoredRow, select_exact, select_first_per_day, select_range};
use crate::compute::temporal::predicate::HourPredicate;
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use dockwatch_types::{Filter, Snapshot};
use parking_lot::RwLock;

/// In-memory collection backed by an insertion-ordered `Vec`.
pub struct MemoryStore<S> {
    rows: RwLock<Vec<StoredRow<S>>>,
}

impl<S: Snapshot> MemoryStore<S> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Create with initial capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: RwLock::new(Vec::with_capacity(capacity)),
        }
    }
}

impl<S: Snapshot> Default for MemoryStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Snapshot> SnapshotStore<S> for MemoryStore<S> {
    fn insert_many(&self, snapshots: Vec<S>) -> Result<usize, StoreError> {
        let count = snapshots.len();
        let mut rows = self.rows.write();
        let mut seq = rows.len() as u64;
        rows.reserve(count);
        for snapshot in snapshots {
            rows.push(StoredRow { seq, snapshot });
            seq += 1;
        }
        Ok(count)
    }

    fn find_exact(
        &self,
        predicate: &HourPredicate,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        Ok(select_exact(&self.rows.read(), predicate, filters))
    }

    fn find_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        Ok(select_range(&self.rows.read(), from, to, filters))
    }

    fn aggregate_first_per_day(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        Ok(select_first_per_day(&self.rows.read(), from, to, filters))
    }

    fn len(&self) -> Result<usize, StoreError> {
        Ok(self.rows.read().len())
    }
}
