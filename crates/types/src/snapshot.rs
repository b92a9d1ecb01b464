use crate::query::Filter;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two datasets the engine keeps a history of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    Station,
    Weather,
}

impl SnapshotKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Station => "station",
            SnapshotKind::Weather => "weather",
        }
    }
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-stamped, immutable record produced by one ingestion run.
///
/// Implementors are plain data; the store and the resolver only need the
/// ingestion timestamp and the ability to test equality filters.
pub trait Snapshot:
    Clone + fmt::Debug + Send + Sync + Serialize + DeserializeOwned + 'static
{
    const KIND: SnapshotKind;

    /// Instant of the ingestion run that produced this snapshot.
    fn timestamp(&self) -> DateTime<Utc>;

    /// Whether this snapshot satisfies a single equality filter.
    ///
    /// Filters on fields the snapshot kind does not have never match.
    fn matches(&self, filter: &Filter) -> bool;

    /// Conjunction of all filters; an empty slice matches everything.
    fn matches_all(&self, filters: &[Filter]) -> bool {
        filters.iter().all(|filter| self.matches(filter))
    }
}
