//! Append-only snapshot storage.
//!
//! One [`SnapshotStore`] per snapshot kind. Stores only ever append; there is
//! no update or delete path. Every row carries an internal sequence number
//! assigned at insertion, which orders ties and never leaves the store.

use crate::compute::temporal::Resolver;
use crate::compute::temporal::predicate::{HourPredicate, calendar_day, within};
use crate::error::StoreError;
use chrono::{DateTime, NaiveDate, Utc};
use dockwatch_types::{Filter, Snapshot, StationSnapshot, WeatherSnapshot};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

mod memory;
pub mod persistence;

pub use memory::MemoryStore;
pub use persistence::LogStore;

/// File name of the station collection inside a data directory.
pub const STATIONS_FILE: &str = "stations.jsonl";
/// File name of the weather collection inside a data directory.
pub const WEATHER_FILE: &str = "weather.jsonl";

/// Trait for snapshot collection implementations
///
/// Results never expose internal identifiers. Reads may run concurrently with
/// an insert and observe either the state before or after the whole batch.
pub trait SnapshotStore<S: Snapshot>: Send + Sync {
    /// Append a batch. No deduplication. Returns the number of rows written.
    fn insert_many(&self, snapshots: Vec<S>) -> Result<usize, StoreError>;

    /// All rows in the predicate's hour that satisfy every filter, in
    /// insertion order.
    fn find_exact(&self, predicate: &HourPredicate, filters: &[Filter])
    -> Result<Vec<S>, StoreError>;

    /// Rows with `from <= timestamp <= to` that satisfy every filter,
    /// timestamp ascending.
    fn find_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError>;

    /// For each calendar day in the range, the earliest matching row only,
    /// day ascending.
    fn aggregate_first_per_day(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        filters: &[Filter],
    ) -> Result<Vec<S>, StoreError>;

    /// Number of stored rows.
    fn len(&self) -> Result<usize, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

/// A snapshot together with its insertion sequence number.
#[derive(Debug, Clone)]
pub(crate) struct StoredRow<S> {
    pub seq: u64,
    pub snapshot: S,
}

pub(crate) fn select_exact<S: Snapshot>(
    rows: &[StoredRow<S>],
    predicate: &HourPredicate,
    filters: &[Filter],
) -> Vec<S> {
    rows.iter()
        .filter(|row| predicate.matches(row.snapshot.timestamp()))
        .filter(|row| row.snapshot.matches_all(filters))
        .map(|row| row.snapshot.clone())
        .collect()
}

fn range_candidates<'a, S: Snapshot>(
    rows: &'a [StoredRow<S>],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    filters: &[Filter],
) -> Vec<&'a StoredRow<S>> {
    let mut candidates: Vec<&StoredRow<S>> = rows
        .iter()
        .filter(|row| within(row.snapshot.timestamp(), from, to))
        .filter(|row| row.snapshot.matches_all(filters))
        .collect();
    candidates.sort_by_key(|row| (row.snapshot.timestamp(), row.seq));
    candidates
}

pub(crate) fn select_range<S: Snapshot>(
    rows: &[StoredRow<S>],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    filters: &[Filter],
) -> Vec<S> {
    range_candidates(rows, from, to, filters)
        .into_iter()
        .map(|row| row.snapshot.clone())
        .collect()
}

pub(crate) fn select_first_per_day<S: Snapshot>(
    rows: &[StoredRow<S>],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    filters: &[Filter],
) -> Vec<S> {
    let mut days: BTreeMap<NaiveDate, &StoredRow<S>> = BTreeMap::new();
    // Candidates are sorted ascending, so the first row seen for a day wins.
    for row in range_candidates(rows, from, to, filters) {
        days.entry(calendar_day(row.snapshot.timestamp())).or_insert(row);
    }
    days.into_values().map(|row| row.snapshot.clone()).collect()
}

/// Handles to both snapshot collections.
#[derive(Clone)]
pub struct Snapshots {
    stations: Arc<dyn SnapshotStore<StationSnapshot>>,
    weather: Arc<dyn SnapshotStore<WeatherSnapshot>>,
}

impl Snapshots {
    pub fn new(
        stations: Arc<dyn SnapshotStore<StationSnapshot>>,
        weather: Arc<dyn SnapshotStore<WeatherSnapshot>>,
    ) -> Self {
        Self { stations, weather }
    }

    pub fn builder() -> crate::builder::SnapshotsBuilder {
        crate::builder::SnapshotsBuilder::new()
    }

    /// Both collections in memory, nothing persisted.
    pub fn memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::<StationSnapshot>::new()),
            Arc::new(MemoryStore::<WeatherSnapshot>::new()),
        )
    }

    /// Open (or create) both collections as append-only logs in `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        Ok(Self::new(
            Arc::new(LogStore::<StationSnapshot>::open(dir.join(STATIONS_FILE))?),
            Arc::new(LogStore::<WeatherSnapshot>::open(dir.join(WEATHER_FILE))?),
        ))
    }

    pub fn stations(&self) -> &Arc<dyn SnapshotStore<StationSnapshot>> {
        &self.stations
    }

    pub fn weather(&self) -> &Arc<dyn SnapshotStore<WeatherSnapshot>> {
        &self.weather
    }

    pub fn station_resolver(&self) -> Resolver<StationSnapshot> {
        Resolver::new(Arc::clone(&self.stations))
    }

    pub fn weather_resolver(&self) -> Resolver<WeatherSnapshot> {
        Resolver::new(Arc::clone(&self.weather))
    }
}

impl std::fmt::Debug for Snapshots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshots")
            .field("stations", &self.stations.len().ok())
            .field("weather", &self.weather.len().ok())
            .finish()
    }
}
