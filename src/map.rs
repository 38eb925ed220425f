//! Waitable map implementation with bounded blocking reads.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{Instant, timeout_at};

use crate::error::Error;
use crate::signal::Signal;

/// A concurrent key-value map whose readers can wait for a key to be written.
///
/// `WaitMap` stores `i64` keys with `i64` values. A [`put`](WaitMap::put)
/// inserts or overwrites a value; a [`get`](WaitMap::get) returns the value
/// immediately if it is present, and otherwise blocks until a writer supplies
/// it or a caller-chosen deadline passes.
///
/// # Concurrency
///
/// A single mutex guards both the value table and the per-key signal table,
/// so a completed `put` is always visible to the next `get`, and a signal
/// never fires before its value is readable. The mutex is never held across
/// an await: a waiting `get` subscribes to the key's signal under the lock,
/// drops the lock, and only then suspends, so the `put` that will release it
/// is free to enter the critical section.
///
/// All waiters for one key share one signal, created by whichever missing
/// `get` arrives first, and a single `put` releases every one of them. Each
/// waiter re-reads the table after waking, so the value it returns reflects
/// any overwrite that landed in between.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use wait_map::WaitMap;
///
/// #[tokio::main]
/// async fn main() -> Result<(), wait_map::Error> {
///     let map = Arc::new(WaitMap::new());
///
///     let reader = tokio::spawn({
///         let map = Arc::clone(&map);
///         async move { map.get(1, Duration::from_secs(1)).await }
///     });
///
///     map.put(1, 100);
///     assert_eq!(reader.await.unwrap()?, 100);
///     Ok(())
/// }
/// ```
pub struct WaitMap {
    inner: Mutex<State>,
}

struct State {
    values: HashMap<i64, i64>,
    signals: HashMap<i64, Signal>,
}

impl WaitMap {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(State {
                values: HashMap::new(),
                signals: HashMap::new(),
            }),
        }
    }

    /// Inserts or overwrites the value for `key` and wakes any tasks
    /// currently waiting on it.
    ///
    /// The value is written and the key's signal fired inside one critical
    /// section, so there is no window where a woken waiter could miss the
    /// value. Repeated puts on the same key are plain overwrites; only the
    /// first one finds a pending signal to fire. Never fails.
    pub fn put(&self, key: i64, value: i64) {
        let state = &mut *self.inner.lock();
        state.values.insert(key, value);

        if let Some(signal) = state.signals.get(&key) {
            if !signal.is_fired() {
                tracing::trace!(key, value, "put released waiters");
                signal.fire();
            }
        }
    }

    /// Gets the value for `key`, waiting up to `max_wait` for it to appear.
    ///
    /// If the value is already present it is returned at once and no signal
    /// is created or touched. Otherwise this registers against the key's
    /// signal (creating it if this is the first waiter) and suspends with the
    /// lock released. A `put` on the key wakes every waiter; each one then
    /// re-reads the table, so the latest write wins even if it landed after
    /// the wake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WaitTimeout`] if `max_wait` elapses first. The
    /// signal is left in place; other waiters and a later `put` are
    /// unaffected. A `max_wait` of zero fails immediately when the value is
    /// absent.
    pub async fn get(&self, key: i64, max_wait: Duration) -> Result<i64, Error> {
        let deadline = Instant::now() + max_wait;

        let mut waiter = {
            let state = &mut *self.inner.lock();
            if let Some(value) = state.values.get(&key) {
                return Ok(*value);
            }
            // First missing get creates the signal; later ones reuse it.
            state.signals.entry(key).or_default().subscribe()
        };

        tracing::trace!(key, "waiting for value");
        if timeout_at(deadline, waiter.fired()).await.is_err() {
            tracing::debug!(key, "wait timed out");
            return Err(Error::WaitTimeout(key));
        }

        // The put wrote the value before firing, under the same lock, so the
        // entry is there by the time we reacquire it.
        let state = self.inner.lock();
        state.values.get(&key).copied().ok_or(Error::WaitTimeout(key))
    }

    /// Gets the value for `key` if it is already present, without waiting.
    pub fn try_get(&self, key: i64) -> Option<i64> {
        self.inner.lock().values.get(&key).copied()
    }

    /// Checks if the map contains a value for `key`.
    pub fn contains_key(&self, key: i64) -> bool {
        self.inner.lock().values.contains_key(&key)
    }

    /// Returns the number of stored values.
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    /// Returns `true` if the map holds no values.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().values.is_empty()
    }
}

impl Default for WaitMap {
    fn default() -> Self {
        Self::new()
    }
}
