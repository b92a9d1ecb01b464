//! HTTP/REST transport
//!
//! # Endpoints
//!
//! - `GET /health`
//! - `GET /api/v1/stations?at=<ts>`
//! - `GET /api/v1/stations/{kioskId}?at=<ts>`
//! - `GET /api/v1/stations/{kioskId}?from=<ts>&to=<ts>&frequency=hourly|daily`

use crate::handler;
use crate::reader::Reader;
use axum::Router;
use axum::routing::get;
use dockwatch::Snapshots;
use std::future::Future;
use tracing::info;

/// Build the router over `snapshots`.
pub fn router(snapshots: &Snapshots) -> Router {
    Router::new()
        .route("/health", get(handler::health))
        .route("/api/v1/stations", get(handler::all_stations))
        .route("/api/v1/stations/:kiosk_id", get(handler::specific_station))
        .with_state(Reader::new(snapshots))
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn run_server(
    listener: tokio::net::TcpListener,
    snapshots: &Snapshots,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = router(snapshots);

    info!("dockwatch HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
