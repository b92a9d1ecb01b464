//! # dockwatch-types
//!
//! Data model shared by the dockwatch snapshot engine and its server.
//!
//! - **Snapshots**: `StationSnapshot`, `WeatherSnapshot`, stamped with the
//!   instant of the ingestion that produced them
//! - **Provider records**: `StationProperties`, `WeatherObservation`, the
//!   unstamped shapes returned by the upstream APIs
//! - **Query vocabulary**: `Frequency`, `Filter`
//!
//! All types are serializable with Serde. Snapshots serialize in camelCase,
//! which is also their on-disk layout.
//!
//! ## Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use dockwatch_types::query::{Filter, Frequency};
//! use dockwatch_types::snapshot::Snapshot;
//! use dockwatch_types::station::{StationProperties, StationSnapshot};
//!
//! let props = StationProperties {
//!     kiosk_id: 3004,
//!     name: "Municipal Services Building Plaza".into(),
//!     total_docks: 30,
//!     docks_available: 12,
//!     bikes_available: 17,
//!     address_street: "1401 John F. Kennedy Blvd.".into(),
//!     address_city: "Philadelphia".into(),
//!     address_state: "PA".into(),
//!     address_zip_code: "19102".into(),
//!     latitude: 39.95378,
//!     longitude: -75.16374,
//! };
//!
//! let at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! let snapshot = StationSnapshot::stamp(props, at);
//! assert!(snapshot.matches(&Filter::KioskId(3004)));
//! assert_eq!(Frequency::from(Some("weekly")), Frequency::Hourly);
//! ```

pub mod query;
pub mod snapshot;
pub mod station;
pub mod weather;

pub use query::{Filter, Frequency, ParseFrequencyError};
pub use snapshot::{Snapshot, SnapshotKind};
pub use station::{Address, StationProperties, StationSnapshot};
pub use weather::{
    Clouds, Conditions, ObservedPrecipitation, ObservedReadings, Precipitation, Readings,
    WeatherObservation, WeatherSnapshot, Wind,
};
