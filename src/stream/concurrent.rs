//! Concurrent report queries
//!
//! Runs a full-table scan and a filtered scan at the same time, each on its
//! own connection, failing fast if either side errors.

use crate::error::Result;
use crate::stream::batch::BatchStreamer;
use crate::stream::store::{RowStore, UserRow};
use futures::TryStreamExt;

/// Fetch every user and the users matching `predicate` concurrently.
///
/// Each side drives its own [`BatchStreamer`], so the two scans never share
/// a connection. Returns `(all, matching)`, both in row order.
pub async fn fetch_all_and_matching<S, P>(
    store: &S,
    batch_size: usize,
    predicate: P,
) -> Result<(Vec<UserRow>, Vec<UserRow>)>
where
    S: RowStore + Clone,
    P: FnMut(&UserRow) -> bool,
{
    let all_streamer = BatchStreamer::new(store.clone(), batch_size);
    let matching_streamer = BatchStreamer::new(store.clone(), batch_size);

    tracing::debug!("running full and filtered user scans concurrently");

    let (all, matching) = tokio::try_join!(
        all_streamer.into_stream().try_collect::<Vec<_>>(),
        matching_streamer
            .stream_filtered(predicate)
            .try_collect::<Vec<_>>(),
    )?;

    Ok((all, matching))
}
