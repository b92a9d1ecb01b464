//! Hourly bike-share and weather snapshot ingestion with calendar-aware
//! point and range queries.
//!
//! ## Features
//! - **Ingestion**: an hourly scheduler fetches station and weather data,
//!   stamps every record with the firing instant and appends it to the store
//! - **Append-only storage**: in-memory collections or JSON-lines logs on disk
//! - **Point queries**: exact-hour matching on UTC calendar fields
//! - **Range queries**: every snapshot, or the first snapshot of each day
//! - **Timing**: uniform elapsed-time logging for sync and async work
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use dockwatch::prelude::*;
//! use dockwatch::types::{Address, StationSnapshot};
//!
//! let snapshots = Snapshots::memory();
//! let at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! snapshots.stations().insert_many(vec![StationSnapshot {
//!     timestamp: at,
//!     kiosk_id: 3004,
//!     name: "Municipal Services Building Plaza".into(),
//!     total_docks: 30,
//!     docks_available: 12,
//!     bikes_available: 18,
//!     address: Address {
//!         street: "1401 John F. Kennedy Blvd.".into(),
//!         city: "Philadelphia".into(),
//!         state: "PA".into(),
//!         zip: "19102".into(),
//!     },
//!     latitude: 39.95378,
//!     longitude: -75.16374,
//! }])?;
//!
//! // Any instant inside the same UTC hour finds it.
//! let later = Utc.with_ymd_and_hms(2024, 1, 1, 10, 45, 0).unwrap();
//! let station = snapshots
//!     .station_resolver()
//!     .resolve_at(later, &[Filter::KioskId(3004)])?;
//! assert_eq!(station.map(|s| s.bikes_available), Some(18));
//! # Ok::<(), dockwatch::DockwatchError>(())
//! ```

pub mod builder;
pub mod clock;
pub mod compute;
pub mod config;
pub mod error;
pub mod fetch;
pub mod ingest;
pub mod storage;
pub mod timing;

pub use builder::SnapshotsBuilder;
pub use error::{DockwatchError, FetchError, Result, StoreError};

pub use clock::{Clock, FixedClock, SystemClock};
pub use compute::temporal::{HourPredicate, Resolver};
pub use config::{Config, PersistenceConfig};
pub use fetch::{Fetcher, StationFetcher, WeatherFetcher};
pub use ingest::{FiringReport, HourlySchedule, IngestionScheduler, PipelineOutcome};
pub use storage::{LogStore, MemoryStore, SnapshotStore, Snapshots};
pub use timing::Timing;

/// Data model shared with the boundary layer.
pub use dockwatch_types as types;
pub use dockwatch_types::{Filter, Frequency, Snapshot, StationSnapshot, WeatherSnapshot};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{DockwatchError, Result, Snapshots, SnapshotsBuilder};

    pub use crate::{Filter, Frequency, Resolver, Snapshot, SnapshotStore};

    pub use crate::{Config, HourlySchedule, IngestionScheduler, Timing};

    pub use crate::{Fetcher, StationFetcher, WeatherFetcher};
}
