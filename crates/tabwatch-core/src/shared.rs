//! Thread-shared tracker handle.

use std::sync::Arc;

use parking_lot::Mutex;

use tabwatch_proto::{ChangeEvent, DataPatch, TabularValue, Topic};

use crate::config::TrackerConfig;
use crate::error::Error;
use crate::metrics::StatsSnapshot;
use crate::tracker::ChangeTracker;

/// A cloneable handle to a tracker guarded by a single mutex.
///
/// Every call holds the lock for its full duration, so replace, select and
/// selection updates never interleave. Callbacks run under the lock and
/// must not call back into the same handle.
#[derive(Debug, Clone)]
pub struct SharedTracker {
    inner: Arc<Mutex<ChangeTracker>>,
}

impl SharedTracker {
    /// Wrap a new tracker with default configuration.
    pub fn new(initial: TabularValue) -> Self {
        Self::from_tracker(ChangeTracker::new(initial))
    }

    /// Wrap a new tracker with the given configuration.
    pub fn with_config(initial: TabularValue, config: TrackerConfig) -> Self {
        Self::from_tracker(ChangeTracker::with_config(initial, config))
    }

    /// Wrap an existing tracker.
    pub fn from_tracker(tracker: ChangeTracker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(tracker)),
        }
    }

    /// See [`ChangeTracker::replace`].
    pub fn replace(&self, patch: DataPatch) -> Result<bool, Error> {
        self.inner.lock().replace(patch)
    }

    /// See [`ChangeTracker::select`].
    pub fn select(&self, indices: &[usize]) -> Result<TabularValue, Error> {
        self.inner.lock().select(indices)
    }

    /// See [`ChangeTracker::set_selection`].
    pub fn set_selection(&self, indices: Vec<usize>) -> Result<bool, Error> {
        self.inner.lock().set_selection(indices)
    }

    /// See [`ChangeTracker::selected`].
    pub fn selected(&self) -> TabularValue {
        self.inner.lock().selected()
    }

    /// See [`ChangeTracker::subscribe`].
    pub fn subscribe<F>(&self, callback: F) -> u64
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.inner.lock().subscribe(callback)
    }

    /// See [`ChangeTracker::watch`].
    pub fn watch<F>(&self, topic: Topic, callback: F) -> u64
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.inner.lock().watch(topic, callback)
    }

    /// See [`ChangeTracker::unsubscribe`].
    pub fn unsubscribe(&self, subscription_id: u64) -> Result<(), Error> {
        self.inner.lock().unsubscribe(subscription_id)
    }

    /// Copy of the current table.
    pub fn snapshot(&self) -> TabularValue {
        self.inner.lock().value().clone()
    }

    /// Current activity counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.lock().stats()
    }

    /// Run a closure with exclusive access to the tracker.
    pub fn with<R>(&self, f: impl FnOnce(&mut ChangeTracker) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use tabwatch_proto::{ColumnData, Value};

    fn counter_table() -> TabularValue {
        TabularValue::new(vec![ColumnData::new("n", vec![0.into()])]).unwrap()
    }

    #[test]
    fn test_concurrent_replaces_each_notify_once() {
        let shared = SharedTracker::new(counter_table());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        shared.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handles: Vec<_> = (1..=8)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared
                        .replace(DataPatch::new().with_column("n", vec![Value::Int(i)]))
                        .unwrap()
                })
            })
            .collect();

        let changed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&changed| changed)
            .count();

        assert_eq!(changed, 8);
        assert_eq!(calls.load(Ordering::SeqCst), 8);
        assert_eq!(shared.stats().replaces, 8);
    }

    #[test]
    fn test_snapshot_and_selection() {
        let shared = SharedTracker::with_config(counter_table(), TrackerConfig::default());
        shared.set_selection(vec![0, 0]).unwrap();

        assert_eq!(shared.selected().row_count(), 2);
        assert_eq!(shared.snapshot(), counter_table());
        assert_eq!(shared.with(|t| t.selection().to_vec()), vec![0, 0]);
    }
}
