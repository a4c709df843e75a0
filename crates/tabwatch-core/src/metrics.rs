//! Tracker activity counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for replace, selection and delivery activity.
///
/// Counters are atomic so they can be recorded through `&self`, including
/// from rejection paths that never take `&mut` on the tracker. Reads through
/// a `SharedTracker` still go through its mutex.
#[derive(Debug, Default)]
pub struct TrackerStats {
    replace_count: AtomicU64,
    noop_count: AtomicU64,
    rejected_count: AtomicU64,
    selection_count: AtomicU64,
    events_published: AtomicU64,
    deliveries: AtomicU64,
}

/// A point-in-time copy of [`TrackerStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Replace calls that committed a change.
    pub replaces: u64,
    /// Replace calls that matched the stored data.
    pub noops: u64,
    /// Replace or selection calls rejected by validation.
    pub rejected: u64,
    /// Selection updates that changed the stored selection.
    pub selections: u64,
    /// Events constructed.
    pub events_published: u64,
    /// Callback invocations across all events.
    pub deliveries: u64,
}

impl TrackerStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed replace.
    pub fn record_replace(&self) {
        self.replace_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a no-op replace.
    pub fn record_noop(&self) {
        self.noop_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected call.
    pub fn record_rejected(&self) {
        self.rejected_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a selection change.
    pub fn record_selection(&self) {
        self.selection_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a published event and how many callbacks received it.
    pub fn record_event(&self, delivered: usize) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.deliveries.fetch_add(delivered as u64, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            replaces: self.replace_count.load(Ordering::Relaxed),
            noops: self.noop_count.load(Ordering::Relaxed),
            rejected: self.rejected_count.load(Ordering::Relaxed),
            selections: self.selection_count.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = TrackerStats::new();
        stats.record_replace();
        stats.record_noop();
        stats.record_noop();
        stats.record_rejected();
        stats.record_event(3);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.replaces, 1);
        assert_eq!(snapshot.noops, 2);
        assert_eq!(snapshot.rejected, 1);
        assert_eq!(snapshot.selections, 0);
        assert_eq!(snapshot.events_published, 1);
        assert_eq!(snapshot.deliveries, 3);
    }
}
