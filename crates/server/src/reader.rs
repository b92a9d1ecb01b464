use crate::protocol::{ErrorBody, InvalidDate, StationAt, StationHistory, StationsAt, parse_date};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dockwatch::types::{Filter, Frequency, StationSnapshot, WeatherSnapshot};
use dockwatch::{Resolver, Snapshots, StoreError};

/// Failure of an API request, mapped onto an HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InvalidDate> for ApiError {
    fn from(e: InvalidDate) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Read side of the API: resolves requests against both collections.
#[derive(Clone)]
pub struct Reader {
    stations: Resolver<StationSnapshot>,
    weather: Resolver<WeatherSnapshot>,
}

impl Reader {
    pub fn new(snapshots: &Snapshots) -> Self {
        Self {
            stations: snapshots.station_resolver(),
            weather: snapshots.weather_resolver(),
        }
    }

    pub fn stations_at(&self, at: &str) -> Result<StationsAt, ApiError> {
        let instant = parse_date(at)?;
        let weather = self.weather.resolve_at(instant, &[])?;
        let stations = self.stations.resolve_all_at(instant, &[])?;

        let stamp = stations
            .first()
            .map(|s| s.timestamp)
            .or_else(|| weather.as_ref().map(|w| w.timestamp));
        let Some(stamp) = stamp else {
            return Err(ApiError::NotFound(format!(
                "Couldn't find information for date: {at}"
            )));
        };

        Ok(StationsAt {
            at: stamp,
            weather,
            stations,
        })
    }

    pub fn station_at(&self, kiosk_id: u32, at: &str) -> Result<StationAt, ApiError> {
        let instant = parse_date(at)?;
        let weather = self.weather.resolve_at(instant, &[])?;
        let station = self
            .stations
            .resolve_at(instant, &[Filter::KioskId(kiosk_id)])?
            .ok_or_else(|| {
                ApiError::NotFound(format!(
                    "Couldn't find information for date: {at}, kioskId: {kiosk_id}"
                ))
            })?;

        Ok(StationAt {
            at: station.timestamp,
            weather,
            station,
        })
    }

    /// Range lookup. Unlike the resolver, unknown frequencies are rejected.
    pub fn station_history(
        &self,
        kiosk_id: u32,
        from: &str,
        to: &str,
        frequency: Option<&str>,
    ) -> Result<StationHistory, ApiError> {
        let from_instant = parse_date(from)?;
        let to_instant = parse_date(to)?;
        let frequency = match frequency {
            None | Some("") => Frequency::Hourly,
            Some(raw) => raw
                .parse::<Frequency>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        };

        let weather = self
            .weather
            .resolve_range(from_instant, to_instant, frequency, &[])?;
        let stations = self.stations.resolve_range(
            from_instant,
            to_instant,
            frequency,
            &[Filter::KioskId(kiosk_id)],
        )?;

        let Some(first) = stations.first() else {
            return Err(ApiError::NotFound(format!(
                "Couldn't find information for dates: from {}, to: {}, kioskId: {kiosk_id}",
                from_instant.to_rfc3339(),
                to_instant.to_rfc3339()
            )));
        };

        Ok(StationHistory {
            at: first.timestamp,
            weather,
            stations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use dockwatch::types::{Address, Clouds, Conditions, Precipitation, Readings, Wind};

    fn station(kiosk_id: u32, ts: DateTime<Utc>) -> StationSnapshot {
        StationSnapshot {
            timestamp: ts,
            kiosk_id,
            name: format!("Station {kiosk_id}"),
            total_docks: 10,
            docks_available: 4,
            bikes_available: 6,
            address: Address {
                street: "N 2nd St".into(),
                city: "Philadelphia".into(),
                state: "PA".into(),
                zip: "19106".into(),
            },
            latitude: 39.95,
            longitude: -75.14,
        }
    }

    fn weather(ts: DateTime<Utc>) -> WeatherSnapshot {
        WeatherSnapshot {
            timestamp: ts,
            name: "Philadelphia".into(),
            conditions: Conditions {
                main: "Rain".into(),
                description: "light rain".into(),
            },
            main: Readings {
                temp: 8.0,
                feels_like: 6.5,
                humidity: 88.0,
            },
            clouds: Clouds { all: 75.0 },
            wind: Wind {
                speed: 5.0,
                deg: 90.0,
            },
            snow: Precipitation::default(),
            rain: Precipitation {
                one_hour: Some(0.4),
                three_hour: None,
            },
        }
    }

    fn hour(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn reader() -> Reader {
        let snapshots = Snapshots::memory();
        snapshots
            .stations()
            .insert_many(vec![
                station(3004, hour(1, 10)),
                station(3005, hour(1, 10)),
                station(3004, hour(1, 11)),
                station(3004, hour(2, 10)),
            ])
            .unwrap();
        snapshots
            .weather()
            .insert_many(vec![weather(hour(1, 10)), weather(hour(2, 10))])
            .unwrap();
        Reader::new(&snapshots)
    }

    #[test]
    fn test_stations_at() {
        let found = reader().stations_at("2024-01-01T10:15:00").unwrap();
        assert_eq!(found.at, hour(1, 10));
        assert_eq!(found.stations.len(), 2);
        assert!(found.weather.is_some());
    }

    #[test]
    fn test_stations_at_uses_weather_time_without_stations() {
        let snapshots = Snapshots::memory();
        snapshots
            .weather()
            .insert_many(vec![weather(hour(5, 3))])
            .unwrap();

        let found = Reader::new(&snapshots)
            .stations_at("2024-01-05T03:00:00Z")
            .unwrap();
        assert_eq!(found.at, hour(5, 3));
        assert!(found.stations.is_empty());
    }

    #[test]
    fn test_stations_at_miss_is_not_found() {
        let err = reader().stations_at("2024-02-01T10:00:00Z").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_station_at_filters_kiosk() {
        let found = reader().station_at(3005, "2024-01-01T10:00:00Z").unwrap();
        assert_eq!(found.station.kiosk_id, 3005);

        let err = reader().station_at(9999, "2024-01-01T10:00:00Z").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("kioskId: 9999"));
    }

    #[test]
    fn test_station_history_frequencies() {
        let reader = reader();
        let (from, to) = ("2024-01-01T00:00:00Z", "2024-01-02T23:00:00Z");

        let hourly = reader.station_history(3004, from, to, None).unwrap();
        assert_eq!(hourly.stations.len(), 3);
        assert_eq!(hourly.weather.len(), 2);

        let daily = reader.station_history(3004, from, to, Some("daily")).unwrap();
        assert_eq!(daily.stations.len(), 2);
        assert_eq!(daily.at, hour(1, 10));

        let empty = reader.station_history(3004, from, to, Some("")).unwrap();
        assert_eq!(empty.stations.len(), 3);
    }

    #[test]
    fn test_station_history_rejects_unknown_frequency() {
        let err = reader()
            .station_history(3004, "2024-01-01", "2024-01-02", Some("weekly"))
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid frequency: weekly");
    }

    #[test]
    fn test_bad_date_is_bad_request() {
        let err = reader().stations_at("not-a-date").unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
