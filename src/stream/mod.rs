//! Batched user-row streaming
//!
//! This module provides lazy, batch-at-a-time access to a user store,
//! flat row streams built on top of the batches, and aggregation helpers.
//!
//! # Module Structure
//!
//! - [`batch`] - Batch streamer with lazy connection handling
//! - [`concurrent`] - Concurrent full and filtered scans
//! - [`store`] - Row store traits and the SQLite implementation
//!
//! # Example
//!
//! ```ignore
//! use orgstream::stream::{BatchStreamer, SqliteStore};
//!
//! async fn example() -> orgstream::error::Result<()> {
//!     let store = SqliteStore::new("users.db");
//!     let mut streamer = BatchStreamer::new(store, 100);
//!     while let Some(batch) = streamer.next_batch().await? {
//!         println!("{} rows", batch.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod concurrent;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::BatchStreamer;
pub use concurrent::fetch_all_and_matching;
pub use store::{RowConnection, RowStore, SqliteStore, UserRow};
