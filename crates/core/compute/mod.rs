//! Query processing over the snapshot history.

pub mod temporal;
