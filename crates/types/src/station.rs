//! Bike-share station status.

use crate::query::Filter;
use crate::snapshot::{Snapshot, SnapshotKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One station as published by the provider (`features[].properties` of the
/// station GeoJSON feed). Unknown provider fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationProperties {
    pub kiosk_id: u32,
    pub name: String,
    pub total_docks: u32,
    pub docks_available: u32,
    pub bikes_available: u32,
    pub address_street: String,
    pub address_city: String,
    pub address_state: String,
    pub address_zip_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Station status at one ingestion instant.
///
/// Identity is `(timestamp, kiosk_id)`. The store does not enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationSnapshot {
    pub timestamp: DateTime<Utc>,
    pub kiosk_id: u32,
    pub name: String,
    pub total_docks: u32,
    pub docks_available: u32,
    pub bikes_available: u32,
    pub address: Address,
    pub latitude: f64,
    pub longitude: f64,
}

impl StationSnapshot {
    /// Normalize a provider record into a snapshot taken at `at`.
    pub fn stamp(props: StationProperties, at: DateTime<Utc>) -> Self {
        Self {
            timestamp: at,
            kiosk_id: props.kiosk_id,
            name: props.name,
            total_docks: props.total_docks,
            docks_available: props.docks_available,
            bikes_available: props.bikes_available,
            address: Address {
                street: props.address_street,
                city: props.address_city,
                state: props.address_state,
                zip: props.address_zip_code,
            },
            latitude: props.latitude,
            longitude: props.longitude,
        }
    }
}

impl Snapshot for StationSnapshot {
    const KIND: SnapshotKind = SnapshotKind::Station;

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn matches(&self, filter: &Filter) -> bool {
        match filter {
            Filter::KioskId(id) => self.kiosk_id == *id,
            Filter::Name(name) => &self.name == name,
        }
    }
}
