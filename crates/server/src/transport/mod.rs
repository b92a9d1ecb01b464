//! Transport layer for the dockwatch server
//!
//! Available transports:
//! - `http` - axum HTTP/REST API

pub mod http;
