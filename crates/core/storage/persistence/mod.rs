//! Durable snapshot collections.
//!
//! - `LogStore`: append-only JSON-lines file, replayed into memory on open

mod jsonl;

pub use jsonl::LogStore;
