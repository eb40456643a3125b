//! Per-instance memoization slot
//!
//! A [`CacheSlot`] belongs to one owning instance and one producing
//! operation. It starts empty, runs its initializer on the first read,
//! and serves the stored value on every read after that. There is no
//! invalidation: once computed, the value lives as long as the owner.
//!
//! A failed initializer leaves the slot empty, so the next read attempts
//! the computation again (no negative caching).

use std::future::Future;
use tokio::sync::RwLock;

/// Slot contents. `Empty -> Computed` happens at most once per slot.
enum SlotState<T> {
    Empty,
    Computed(T),
}

/// A lazily-computed, instance-bound cache slot.
///
/// The write guard is held across the initializer, so concurrent first
/// reads from multiple tasks still run the computation exactly once; the
/// losers of the race observe the stored value.
pub struct CacheSlot<T> {
    state: RwLock<SlotState<T>>,
}

impl<T: Clone> CacheSlot<T> {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SlotState::Empty),
        }
    }

    /// Return the cached value, computing it via `init` on the first read.
    ///
    /// `init` is not invoked when the slot is already computed. If `init`
    /// fails, the error propagates and the slot stays empty.
    pub async fn get_or_try_init<F, Fut, E>(&self, init: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        // Fast path: already computed, a read lock suffices.
        {
            let state = self.state.read().await;
            if let SlotState::Computed(value) = &*state {
                return Ok(value.clone());
            }
        }

        let mut state = self.state.write().await;
        // A concurrent task may have filled the slot while we waited.
        if let SlotState::Computed(value) = &*state {
            return Ok(value.clone());
        }

        let value = init().await?;
        *state = SlotState::Computed(value.clone());
        Ok(value)
    }

    /// Whether the slot has transitioned to its computed state.
    pub async fn is_computed(&self) -> bool {
        matches!(*self.state.read().await, SlotState::Computed(_))
    }
}

impl<T: Clone> Default for CacheSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
