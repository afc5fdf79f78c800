//! SQLite storage layer.
//!
//! Persistent attribute storage backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod attributes;
pub mod deferred;
pub mod pool;
