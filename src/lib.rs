//! orgstream - GitHub org inspection and batched user streaming
//!
//! This crate pairs a lazy, memoizing GitHub organization client with a
//! batch-at-a-time streaming layer over a local SQLite user store.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod nested;
pub mod stream;

pub use cache::CacheSlot;
pub use config::Config;
pub use error::{Error, Result};
pub use github::{HttpTransport, OrgClient};
pub use stream::{BatchStreamer, RowConnection, RowStore, SqliteStore, UserRow};
