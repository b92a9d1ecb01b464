//! Provider adapters.
//!
//! Each fetcher performs exactly one outbound GET per call and hands back
//! unstamped provider records. Transport failures are classified into the
//! [`FetchError`] transport variants; a reachable provider with nothing
//! usable to say yields [`FetchError::EmptyResult`].

use crate::error::FetchError;
use async_trait::async_trait;
use dockwatch_types::SnapshotKind;
use serde_json::Value;

mod station;
mod weather;

pub use station::StationFetcher;
pub use weather::{PHILADELPHIA_LATITUDE, PHILADELPHIA_LONGITUDE, WeatherFetcher};

/// One provider endpoint.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Normalized payload handed to the ingestion pipeline.
    type Output: Send;

    /// Dataset this fetcher feeds.
    fn kind(&self) -> SnapshotKind;

    async fn fetch(&self) -> Result<Self::Output, FetchError>;
}

/// GET `url` with `query` and decode the body as JSON.
///
/// `label` is the URL reported in errors; query parameters (which may carry
/// credentials) never appear in it.
pub(crate) async fn get_json(
    client: &reqwest::Client,
    kind: SnapshotKind,
    label: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<Value, FetchError> {
    let parsed = url::Url::parse(url).map_err(|e| FetchError::RequestNotSent {
        url: label.to_string(),
        reason: e.to_string(),
    })?;

    let response = client
        .get(parsed)
        .query(query)
        .send()
        .await
        .map_err(|e| FetchError::from_transport(label, e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read body>".to_string());
        return Err(FetchError::RemoteRejected {
            url: label.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::from_transport(label, e))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| FetchError::empty(kind, format!("malformed payload: {e}")))
}
