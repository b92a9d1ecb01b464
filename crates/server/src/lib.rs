//! dockwatch server
//!
//! Serves the station/weather snapshot history over HTTP and runs the hourly
//! ingestion loop next to it.
//!
//! # Example
//!
//! ```ignore
//! use dockwatch_server::run_server;
//!
//! run_server(listener, &snapshots, shutdown).await?;
//! ```

pub mod handler;
pub mod protocol;
pub mod reader;
pub mod transport;
pub mod writer;

pub use protocol::{ErrorBody, SnapshotQuery, StationAt, StationHistory, StationsAt, parse_date};
pub use reader::{ApiError, Reader};
pub use writer::spawn_ingestion;

// Re-export default transport for convenience
pub use transport::http::{router, run_server};
