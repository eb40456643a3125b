//! Batch streamer
//!
//! A pull cursor over a [`RowStore`]: each `next_batch` issues one bounded
//! fetch and advances the offset, so nothing larger than one batch is ever
//! held in memory. The connection is acquired on the first fetch and
//! released exactly once, as soon as the cursor ends for any reason
//! (exhaustion, fetch failure, or mid-stream drop).

use crate::error::Result;
use crate::stream::store::{RowConnection, RowStore, UserRow};
use futures::stream::{self, Stream};
use futures::{future, TryStreamExt};

/// Cursor-driven streamer yielding bounded batches of rows
pub struct BatchStreamer<S: RowStore> {
    store: S,
    batch_size: usize,
    conn: Option<S::Conn>,
    offset: u64,
    exhausted: bool,
}

impl<S: RowStore> BatchStreamer<S> {
    /// Create a streamer reading `batch_size` rows per fetch.
    ///
    /// A zero batch size is bumped to one so the cursor always makes
    /// progress.
    pub fn new(store: S, batch_size: usize) -> Self {
        Self {
            store,
            batch_size: batch_size.max(1),
            conn: None,
            offset: 0,
            exhausted: false,
        }
    }

    /// Rows consumed so far
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the cursor has reached end-of-stream
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Fetch the next batch, or `None` at end-of-stream.
    ///
    /// The first call opens the store connection. A fetch returning fewer
    /// rows than requested marks the cursor exhausted, so the following
    /// call ends the stream without touching the store again. Past
    /// exhaustion the call is idempotent: no rows, no errors.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<UserRow>>> {
        if self.exhausted {
            return Ok(None);
        }

        // Take the handle for the duration of the fetch; it only goes back
        // if the stream continues, so every other exit path drops it.
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => self.store.connect().await?,
        };

        let rows = match conn.fetch(self.batch_size, self.offset).await {
            Ok(rows) => rows,
            Err(e) => {
                self.exhausted = true;
                return Err(e);
            }
        };

        self.offset += rows.len() as u64;

        if rows.len() < self.batch_size {
            self.exhausted = true;
            tracing::debug!(total = self.offset, "row stream exhausted");
        } else {
            self.conn = Some(conn);
        }

        if rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(rows))
    }

    /// Lazily stream every remaining row, hiding batch boundaries.
    ///
    /// Single-pass and finite. The streamer is consumed; iterating again
    /// requires a fresh instance.
    pub fn into_stream(self) -> impl Stream<Item = Result<UserRow>> {
        stream::try_unfold(self, |mut streamer| async move {
            match streamer.next_batch().await? {
                Some(batch) => {
                    let rows = stream::iter(batch.into_iter().map(Ok::<_, crate::error::Error>));
                    // try_flatten leaves the unfold's error type open; pin it.
                    Ok::<_, crate::error::Error>(Some((rows, streamer)))
                }
                None => Ok(None),
            }
        })
        .try_flatten()
    }

    /// Lazily stream the rows for which `predicate` holds
    pub fn stream_filtered<P>(self, mut predicate: P) -> impl Stream<Item = Result<UserRow>>
    where
        P: FnMut(&UserRow) -> bool,
    {
        self.into_stream()
            .try_filter(move |row| future::ready(predicate(row)))
    }

    /// Average of `extract(row)` over the whole stream.
    ///
    /// Consumes the stream once, holding only a running `(sum, count)`
    /// pair; memory use does not depend on the row count. `None` means the
    /// store had no rows. A zero count is never divided by.
    pub async fn running_average<F>(self, mut extract: F) -> Result<Option<f64>>
    where
        F: FnMut(&UserRow) -> f64,
    {
        let mut sum = 0.0;
        let mut count: u64 = 0;

        let rows = self.into_stream();
        futures::pin_mut!(rows);
        while let Some(row) = rows.try_next().await? {
            sum += extract(&row);
            count += 1;
        }

        if count == 0 {
            return Ok(None);
        }
        Ok(Some(sum / count as f64))
    }
}
