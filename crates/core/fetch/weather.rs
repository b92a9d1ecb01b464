use super::{Fetcher, get_json};
use crate::error::FetchError;
use async_trait::async_trait;
use dockwatch_types::{SnapshotKind, WeatherObservation};
use serde_json::Value;

/// Latitude of the single observation point.
pub const PHILADELPHIA_LATITUDE: f64 = 39.952583;
/// Longitude of the single observation point.
pub const PHILADELPHIA_LONGITUDE: f64 = -75.165222;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Current-weather endpoint, always queried at the fixed coordinate in
/// metric units.
#[derive(Clone)]
pub struct WeatherFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherFetcher {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            CURRENT_WEATHER_PATH
        )
    }

    fn query(&self) -> [(&'static str, String); 4] {
        [
            ("lat", PHILADELPHIA_LATITUDE.to_string()),
            ("lon", PHILADELPHIA_LONGITUDE.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]
    }
}

impl std::fmt::Debug for WeatherFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherFetcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Fetcher for WeatherFetcher {
    type Output = WeatherObservation;

    fn kind(&self) -> SnapshotKind {
        SnapshotKind::Weather
    }

    async fn fetch(&self) -> Result<WeatherObservation, FetchError> {
        log::debug!("Requesting current weather from {}", self.base_url);
        let payload = get_json(
            &self.client,
            self.kind(),
            &self.base_url,
            &self.endpoint(),
            &self.query(),
        )
        .await?;

        if !matches!(&payload, Value::Object(body) if !body.is_empty()) {
            return Err(FetchError::empty(
                SnapshotKind::Weather,
                "payload is empty or not an object",
            ));
        }
        serde_json::from_value(payload)
            .map_err(|e| FetchError::empty(SnapshotKind::Weather, e.to_string()))
    }
}
