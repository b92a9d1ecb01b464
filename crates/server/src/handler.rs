//! axum handlers for the station API

use crate::protocol::{SnapshotQuery, StationHistory, StationsAt};
use crate::reader::{ApiError, Reader};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};

pub async fn health() -> &'static str {
    "ok"
}

/// `GET /api/v1/stations?at=`
pub async fn all_stations(
    State(reader): State<Reader>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Json<StationsAt>, ApiError> {
    let at = query.at.unwrap_or_default();
    reader.stations_at(&at).map(Json)
}

/// `GET /api/v1/stations/{kioskId}?at=` or `?from=&to=&frequency=`
pub async fn specific_station(
    State(reader): State<Reader>,
    Path(kiosk_id): Path<String>,
    Query(query): Query<SnapshotQuery>,
) -> Result<Response, ApiError> {
    let kiosk_id: u32 = kiosk_id.parse().map_err(|_| {
        ApiError::BadRequest("Validation failed (numeric string is expected)".to_string())
    })?;

    match query {
        SnapshotQuery { at: Some(at), .. } if !at.is_empty() => {
            Ok(Json(reader.station_at(kiosk_id, &at)?).into_response())
        }
        SnapshotQuery {
            from: Some(from),
            to: Some(to),
            frequency,
            ..
        } if !from.is_empty() && !to.is_empty() => {
            let history: StationHistory =
                reader.station_history(kiosk_id, &from, &to, frequency.as_deref())?;
            Ok(Json(history).into_response())
        }
        _ => Err(ApiError::BadRequest("Bad request".to_string())),
    }
}
