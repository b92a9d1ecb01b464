use super::predicate::HourPredicate;
use crate::error::StoreError;
use crate::storage::SnapshotStore;
use chrono::{DateTime, Utc};
use dockwatch_types::{Filter, Frequency, Snapshot};
use std::fmt::Write as _;
use std::sync::Arc;

/// Turns a requested instant or interval into a lookup against one snapshot
/// collection.
///
/// A miss is never an error: point lookups return `None`, range lookups an
/// empty `Vec`, and both log a warning.
pub struct Resolver<S: Snapshot> {
    store: Arc<dyn SnapshotStore<S>>,
}

impl<S: Snapshot> Clone for Resolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Snapshot> Resolver<S> {
    pub fn new(store: Arc<dyn SnapshotStore<S>>) -> Self {
        Self { store }
    }

    /// First snapshot, in insertion order, stored during the same UTC clock
    /// hour as `instant` and satisfying every filter.
    pub fn resolve_at(
        &self,
        instant: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Option<S>, StoreError> {
        Ok(self.resolve_all_at(instant, filters)?.into_iter().next())
    }

    /// Every snapshot stored during the same UTC clock hour as `instant`.
    pub fn resolve_all_at(
        &self,
        instant: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        let predicate = HourPredicate::of(instant);
        let found = self.store.find_exact(&predicate, filters)?;
        if found.is_empty() {
            log::warn!(
                "No {} snapshot found at {}{}",
                S::KIND,
                instant.to_rfc3339(),
                describe(filters)
            );
        }
        Ok(found)
    }

    /// Snapshots with `from <= timestamp <= to`, ascending.
    ///
    /// `frequency` accepts a [`Frequency`] or a raw query value; anything
    /// other than `"daily"` samples hourly.
    pub fn resolve_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        frequency: impl Into<Frequency>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError> {
        let frequency = frequency.into();
        let found = match frequency {
            Frequency::Hourly => self.store.find_range(from, to, filters)?,
            Frequency::Daily => self.store.aggregate_first_per_day(from, to, filters)?,
        };
        if found.is_empty() {
            log::warn!(
                "No {} snapshots found between {} and {} ({}){}",
                S::KIND,
                from.to_rfc3339(),
                to.to_rfc3339(),
                frequency,
                describe(filters)
            );
        }
        Ok(found)
    }
}

fn describe(filters: &[Filter]) -> String {
    let mut out = String::new();
    for (i, filter) in filters.iter().enumerate() {
        let sep = if i == 0 { " with " } else { ", " };
        let _ = write!(out, "{sep}{filter}");
    }
    out
}
