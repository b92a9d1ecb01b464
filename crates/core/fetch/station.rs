use super::{Fetcher, get_json};
use crate::error::FetchError;
use async_trait::async_trait;
use dockwatch_types::{SnapshotKind, StationProperties};
use serde_json::Value;

/// Bike-share station feed (a GeoJSON feature collection).
#[derive(Debug, Clone)]
pub struct StationFetcher {
    client: reqwest::Client,
    url: String,
}

impl StationFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Fetcher for StationFetcher {
    type Output = Vec<StationProperties>;

    fn kind(&self) -> SnapshotKind {
        SnapshotKind::Station
    }

    async fn fetch(&self) -> Result<Vec<StationProperties>, FetchError> {
        log::debug!("Requesting stations from {}", self.url);
        let payload = get_json(&self.client, self.kind(), &self.url, &self.url, &[]).await?;
        project_properties(payload)
    }
}

/// `features[*].properties`, skipping features that do not decode.
fn project_properties(payload: Value) -> Result<Vec<StationProperties>, FetchError> {
    let features = match payload {
        Value::Object(mut body) => match body.remove("features") {
            Some(Value::Array(features)) => features,
            _ => return Err(FetchError::empty(SnapshotKind::Station, "no feature list")),
        },
        _ => return Err(FetchError::empty(SnapshotKind::Station, "payload is not an object")),
    };

    if features.is_empty() {
        return Err(FetchError::empty(SnapshotKind::Station, "feature list is empty"));
    }

    let total = features.len();
    let mut stations = Vec::with_capacity(total);
    for (index, mut feature) in features.into_iter().enumerate() {
        let properties = feature
            .get_mut("properties")
            .map(Value::take)
            .unwrap_or(Value::Null);
        match serde_json::from_value::<StationProperties>(properties) {
            Ok(station) => stations.push(station),
            Err(e) => log::warn!("Skipping station feature {index}: {e}"),
        }
    }

    if stations.is_empty() {
        return Err(FetchError::empty(
            SnapshotKind::Station,
            format!("none of {total} features carried valid properties"),
        ));
    }
    Ok(stations)
}
