//! Configuration for providers, scheduling and persistence.
use crate::error::{DockwatchError, Result};
use crate::ingest::HourlySchedule;
use serde::de::Error;
use std::path::PathBuf;
use std::time::Duration;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Station feed (GeoJSON feature collection)
    #[serde(default = "Config::default_stations_url")]
    pub stations_url: String,

    /// Base URL of the weather provider
    #[serde(default = "Config::default_weather_url")]
    pub weather_url: String,

    #[serde(default)]
    pub weather_api_key: String,

    /// IANA name of the timezone the hourly schedule runs in
    #[serde(default = "Config::default_timezone")]
    pub timezone: String,

    #[serde(default = "Config::default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Persistence configuration
    #[serde(default)]
    pub persistence: PersistenceConfig,
}

/// Where snapshots are kept
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersistenceConfig {
    /// Directory holding the snapshot logs; `None` keeps everything in memory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl PersistenceConfig {
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            data_dir: Some(dir.into()),
        }
    }
}

impl Config {
    pub const DEFAULT_STATIONS_URL: &'static str = "https://www.rideindego.com/stations/json/";
    pub const DEFAULT_WEATHER_URL: &'static str = "https://api.openweathermap.org";
    pub const DEFAULT_TIMEZONE: &'static str = "America/New_York";

    fn default_stations_url() -> String {
        Self::DEFAULT_STATIONS_URL.to_string()
    }

    fn default_weather_url() -> String {
        Self::DEFAULT_WEATHER_URL.to_string()
    }

    fn default_timezone() -> String {
        Self::DEFAULT_TIMEZONE.to_string()
    }

    const fn default_request_timeout_secs() -> u64 {
        30
    }

    pub fn with_stations_url(mut self, url: impl Into<String>) -> Self {
        self.stations_url = url.into();
        self
    }

    pub fn with_weather_url(mut self, url: impl Into<String>) -> Self {
        self.weather_url = url.into();
        self
    }

    pub fn with_weather_api_key(mut self, key: impl Into<String>) -> Self {
        self.weather_api_key = key.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        assert!(secs > 0, "Request timeout must be greater than zero");
        self.request_timeout_secs = secs;
        self
    }

    pub fn with_persistence(mut self, config: PersistenceConfig) -> Self {
        self.persistence = config;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Hourly cadence in the configured timezone.
    pub fn schedule(&self) -> Result<HourlySchedule> {
        HourlySchedule::parse(&self.timezone)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("stations_url", &self.stations_url),
            ("weather_url", &self.weather_url),
        ] {
            url::Url::parse(value).map_err(|e| format!("{field} is not a valid URL: {e}"))?;
        }

        if self.request_timeout_secs == 0 {
            return Err("Request timeout must be greater than zero".to_string());
        }

        if self.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(format!("Unknown timezone: {}", self.timezone));
        }

        Ok(())
    }

    /// Stricter check run before starting ingestion: the weather provider
    /// rejects requests without a key.
    pub fn validate_for_ingestion(&self) -> Result<()> {
        self.validate().map_err(DockwatchError::Config)?;
        if self.weather_api_key.trim().is_empty() {
            return Err(DockwatchError::Config(
                "weather_api_key must be set to ingest weather".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations_url: Self::default_stations_url(),
            weather_url: Self::default_weather_url(),
            weather_api_key: String::new(),
            timezone: Self::default_timezone(),
            request_timeout_secs: Self::default_request_timeout_secs(),
            persistence: PersistenceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.stations_url, "https://www.rideindego.com/stations/json/");
        assert_eq!(config.weather_url, "https://api.openweathermap.org");
        assert_eq!(config.timezone, "America/New_York");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.persistence.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default()
            .with_weather_api_key("secret")
            .with_timezone("Europe/Berlin")
            .with_request_timeout_secs(5)
            .with_persistence(PersistenceConfig::in_dir("/var/lib/dockwatch"));

        let json = config.to_json().unwrap();
        let deserialized = Config::from_json(&json).unwrap();

        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = Config::from_json(r#"{"weather_api_key": "k"}"#).unwrap();
        assert_eq!(config.weather_api_key, "k");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(Config::from_json(r#"{"sync_policy": "always"}"#).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(
            Config::default()
                .with_timezone("Mars/Olympus_Mons")
                .validate()
                .unwrap_err()
                .contains("Unknown timezone")
        );
        assert!(
            Config::default()
                .with_stations_url("not a url")
                .validate()
                .unwrap_err()
                .contains("stations_url")
        );
        assert!(Config::from_json(r#"{"request_timeout_secs": 0}"#).is_err());
    }

    #[test]
    fn test_ingestion_requires_api_key() {
        let err = Config::default().validate_for_ingestion().unwrap_err();
        assert!(matches!(err, DockwatchError::Config(_)));

        assert!(
            Config::default()
                .with_weather_api_key("k")
                .validate_for_ingestion()
                .is_ok()
        );
    }

    #[test]
    fn test_schedule_uses_timezone() {
        let schedule = Config::default().with_timezone("Asia/Kolkata").schedule().unwrap();
        assert_eq!(schedule.timezone(), chrono_tz::Asia::Kolkata);

        assert!(matches!(
            Config::default().with_timezone("Nowhere").schedule(),
            Err(DockwatchError::UnknownTimezone(_))
        ));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_config_toml() {
        let config = Config::from_toml(
            r#"
            weather_api_key = "k"
            timezone = "America/Chicago"

            [persistence]
            data_dir = "/tmp/dockwatch"
            "#,
        )
        .unwrap();
        assert_eq!(config.timezone, "America/Chicago");
        assert_eq!(
            config.persistence.data_dir,
            Some(PathBuf::from("/tmp/dockwatch"))
        );
        assert_eq!(Config::from_toml(&config.to_toml().unwrap()).unwrap(), config);
    }
}
