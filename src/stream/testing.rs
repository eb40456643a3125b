//! In-memory store doubles for streamer tests
//!
//! `MockStore` slices a fixed row set per fetch and counts every open and
//! release, so tests can pin the handle lifecycle exactly.

use crate::error::{Error, Result};
use crate::stream::store::{RowConnection, RowStore, UserRow};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// The seven sample users seeded by the CLI demo
pub fn sample_users() -> Vec<UserRow> {
    let people = [
        ("Alice", 30),
        ("Bob", 24),
        ("Charlie", 35),
        ("David", 42),
        ("Eve", 22),
        ("Frank", 50),
        ("Grace", 45),
    ];

    people
        .iter()
        .enumerate()
        .map(|(i, (name, age))| UserRow {
            id: i as i64 + 1,
            name: (*name).to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            age: *age,
        })
        .collect()
}

/// Ages of the sample users, in row order
pub fn ages() -> [i64; 7] {
    [30, 24, 35, 42, 22, 50, 45]
}

/// Vec-backed store with open/release counters
#[derive(Clone)]
pub struct MockStore {
    rows: Vec<UserRow>,
    pub opened: Arc<AtomicUsize>,
    pub released: Arc<AtomicUsize>,
    fail_on_fetch: Option<usize>,
}

impl MockStore {
    pub fn with_rows(rows: Vec<UserRow>) -> Self {
        Self {
            rows,
            opened: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
            fail_on_fetch: None,
        }
    }

    /// Make the n-th fetch (zero-based) on each connection fail
    pub fn failing_on_fetch(mut self, index: usize) -> Self {
        self.fail_on_fetch = Some(index);
        self
    }
}

#[async_trait]
impl RowStore for MockStore {
    type Conn = MockConnection;

    async fn connect(&self) -> Result<MockConnection> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(MockConnection {
            rows: self.rows.clone(),
            released: Arc::clone(&self.released),
            fail_on_fetch: self.fail_on_fetch,
            fetches: 0,
        })
    }
}

/// Connection double; its `Drop` is the release being counted
pub struct MockConnection {
    rows: Vec<UserRow>,
    released: Arc<AtomicUsize>,
    fail_on_fetch: Option<usize>,
    fetches: usize,
}

#[async_trait]
impl RowConnection for MockConnection {
    async fn fetch(&mut self, limit: usize, offset: u64) -> Result<Vec<UserRow>> {
        let index = self.fetches;
        self.fetches += 1;

        if self.fail_on_fetch == Some(index) {
            return Err(Error::Store(rusqlite::Error::InvalidQuery));
        }

        let start = (offset as usize).min(self.rows.len());
        let end = (start + limit).min(self.rows.len());
        Ok(self.rows[start..end].to_vec())
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
