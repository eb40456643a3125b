//! Row store collaborators
//!
//! The streamer reads through a narrow seam: a store hands out exclusive
//! connections, and a connection answers bounded `fetch(limit, offset)`
//! reads in a stable order. The SQLite implementation below is the one the
//! CLI uses; tests substitute their own.

use crate::error::Result;
use async_trait::async_trait;
use rusqlite::Connection;
use std::path::PathBuf;

/// A single row from the backing `users` table
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// A source of paginated row reads
#[async_trait]
pub trait RowStore {
    type Conn: RowConnection;

    /// Open a fresh connection.
    ///
    /// Every caller gets its own handle; connections are never shared
    /// between streamers.
    async fn connect(&self) -> Result<Self::Conn>;
}

/// An open, exclusively-owned read handle.
///
/// Dropping the handle releases the underlying resource.
#[async_trait]
pub trait RowConnection: Send {
    /// Fetch up to `limit` rows starting at `offset`, in stable order.
    async fn fetch(&mut self, limit: usize, offset: u64) -> Result<Vec<UserRow>>;
}

/// SQLite-backed row store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RowStore for SqliteStore {
    type Conn = SqliteRowConnection;

    async fn connect(&self) -> Result<Self::Conn> {
        tracing::debug!(path = %self.path.display(), "opening SQLite database");
        let conn = Connection::open(&self.path)?;
        Ok(SqliteRowConnection { conn })
    }
}

/// One open SQLite read handle; closed when dropped
pub struct SqliteRowConnection {
    conn: Connection,
}

#[async_trait]
impl RowConnection for SqliteRowConnection {
    async fn fetch(&mut self, limit: usize, offset: u64) -> Result<Vec<UserRow>> {
        tracing::debug!(limit, offset, "fetching user rows");

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, age FROM users ORDER BY id LIMIT ?1 OFFSET ?2")?;
        let rows = stmt
            .query_map(
                rusqlite::params![limit as i64, offset as i64],
                |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        age: row.get(3)?,
                    })
                },
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
