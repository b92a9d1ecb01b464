//! Request and response shapes of the HTTP API.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use dockwatch::types::{StationSnapshot, WeatherSnapshot};
use serde::{Deserialize, Serialize};

/// Query string accepted by the station endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotQuery {
    pub at: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub frequency: Option<String>,
}

/// Weather plus every station at one hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationsAt {
    pub at: DateTime<Utc>,
    pub weather: Option<WeatherSnapshot>,
    pub stations: Vec<StationSnapshot>,
}

/// Weather plus a single station at one hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationAt {
    pub at: DateTime<Utc>,
    pub weather: Option<WeatherSnapshot>,
    pub station: StationSnapshot,
}

/// Weather and one station over a range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationHistory {
    pub at: DateTime<Utc>,
    pub weather: Vec<WeatherSnapshot>,
    pub stations: Vec<StationSnapshot>,
}

/// Error body, `{ "statusCode": 404, "message": "..." }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub status_code: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Couldn't parse date string: {0}")]
pub struct InvalidDate(pub String);

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a query timestamp. Values without an explicit offset are UTC.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, InvalidDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidDate(raw.to_string()));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(naive, format) {
            return Ok(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_date_variants() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 10, 30, 0).unwrap();

        assert_eq!(parse_date("2024-01-02T10:30:00Z").unwrap(), expected);
        assert_eq!(parse_date("2024-01-02T10:30:00").unwrap(), expected);
        assert_eq!(parse_date("2024-01-02T10:30:00.000").unwrap(), expected);
        assert_eq!(parse_date("2024-01-02T10:30").unwrap(), expected);
        assert_eq!(parse_date("2024-01-02T10:30Z").unwrap(), expected);
        assert_eq!(parse_date("2024-01-02T12:30:00+02:00").unwrap(), expected);
        assert_eq!(
            parse_date("2024-01-02").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        for raw in ["", "   ", "yesterday", "2024-13-01T00:00:00Z", "2024-01-02T25:00"] {
            let err = parse_date(raw).unwrap_err();
            assert_eq!(err.to_string(), format!("Couldn't parse date string: {raw}"));
        }
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            status_code: 404,
            message: "missing".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "statusCode": 404, "message": "missing" })
        );
    }
}
