//! Error types for dockwatch.

use dockwatch_types::SnapshotKind;
use thiserror::Error;

/// Failure of a single provider fetch.
///
/// The first three variants describe transport failures; `EmptyResult` means
/// the provider was reached but had nothing usable to say.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered with a non-success status.
    #[error("{url} responded with: {status} - {body}")]
    RemoteRejected {
        url: String,
        status: u16,
        body: String,
    },

    /// The request went out but no response came back.
    #[error("{url} failed to respond: {reason}")]
    RemoteUnreachable { url: String, reason: String },

    /// The request could not be built or dispatched at all.
    #[error("Couldn't make request to {url}: {reason}")]
    RequestNotSent { url: String, reason: String },

    /// The provider answered but the payload was missing, malformed or empty.
    #[error("Couldn't find any {kind} information: {detail}")]
    EmptyResult { kind: SnapshotKind, detail: String },
}

impl FetchError {
    /// Classify a `reqwest` failure for `url` into a transport variant.
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_builder() {
            FetchError::RequestNotSent {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            FetchError::RemoteRejected {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::new(),
            }
        } else {
            FetchError::RemoteUnreachable {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    pub(crate) fn empty(kind: SnapshotKind, detail: impl Into<String>) -> Self {
        FetchError::EmptyResult {
            kind,
            detail: detail.into(),
        }
    }

    /// Whether the provider could not be reached, as opposed to answering
    /// with nothing usable.
    pub fn is_transport(&self) -> bool {
        !matches!(self, FetchError::EmptyResult { .. })
    }
}

/// Persistence failure of the snapshot store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Umbrella error for the ingestion pipeline and the public API.
#[derive(Debug, Error)]
pub enum DockwatchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

pub type Result<T, E = DockwatchError> = std::result::Result<T, E>;
