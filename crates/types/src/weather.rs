//! Local weather observations.

use crate::query::Filter;
use crate::snapshot::{Snapshot, SnapshotKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current-weather response from the provider, reduced to the fields the
/// engine keeps. Missing sections deserialize to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub weather: Vec<Conditions>,
    #[serde(default)]
    pub main: ObservedReadings,
    #[serde(default)]
    pub clouds: Clouds,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub snow: Option<ObservedPrecipitation>,
    #[serde(default)]
    pub rain: Option<ObservedPrecipitation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedReadings {
    #[serde(default)]
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    #[serde(default)]
    pub humidity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservedPrecipitation {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    pub three_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Readings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Precipitation {
    pub one_hour: Option<f64>,
    pub three_hour: Option<f64>,
}

impl From<ObservedPrecipitation> for Precipitation {
    fn from(observed: ObservedPrecipitation) -> Self {
        Self {
            one_hour: observed.one_hour,
            three_hour: observed.three_hour,
        }
    }
}

/// Weather at one ingestion instant. Identity is `timestamp` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub conditions: Conditions,
    pub main: Readings,
    pub clouds: Clouds,
    pub wind: Wind,
    pub snow: Precipitation,
    pub rain: Precipitation,
}

impl WeatherSnapshot {
    /// Normalize a provider observation into a snapshot taken at `at`.
    ///
    /// The provider reports a list of condition entries; the first one is the
    /// primary condition and is the one kept.
    pub fn stamp(observation: WeatherObservation, at: DateTime<Utc>) -> Self {
        let WeatherObservation {
            name,
            weather,
            main,
            clouds,
            wind,
            snow,
            rain,
        } = observation;

        Self {
            timestamp: at,
            name,
            conditions: weather.into_iter().next().unwrap_or_default(),
            main: Readings {
                temp: main.temp,
                feels_like: main.feels_like,
                humidity: main.humidity,
            },
            clouds,
            wind,
            snow: snow.map(Precipitation::from).unwrap_or_default(),
            rain: rain.map(Precipitation::from).unwrap_or_default(),
        }
    }
}

impl Snapshot for WeatherSnapshot {
    const KIND: SnapshotKind = SnapshotKind::Weather;

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn matches(&self, filter: &Filter) -> bool {
        match filter {
            Filter::Name(name) => &self.name == name,
            Filter::KioskId(_) => false,
        }
    }
}
