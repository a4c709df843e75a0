//! Change tracking over a tabular value.
//!
//! [`ChangeTracker`] owns the current table. Proposed edits go through
//! [`ChangeTracker::replace`], which validates the whole patch, compares it
//! cell by cell against the stored columns and publishes a single
//! [`ChangeEvent`] only when something observable changed.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use tabwatch_proto::{ChangeEvent, DataPatch, TabularValue, Topic, Value};

use crate::columns::{ColumnLayout, ColumnOptions};
use crate::config::TrackerConfig;
use crate::error::Error;
use crate::metrics::{StatsSnapshot, TrackerStats};
use crate::pubsub::PubSubManager;

/// Owns a table, detects meaningful edits and notifies subscribers.
#[derive(Debug)]
pub struct ChangeTracker {
    current: TabularValue,
    selection: Vec<usize>,
    pubsub: PubSubManager,
    config: TrackerConfig,
    stats: TrackerStats,
    next_sequence: u64,
}

impl ChangeTracker {
    /// Create a tracker with default configuration.
    pub fn new(initial: TabularValue) -> Self {
        Self::with_config(initial, TrackerConfig::default())
    }

    /// Create a tracker with the given configuration.
    pub fn with_config(initial: TabularValue, config: TrackerConfig) -> Self {
        Self {
            current: initial,
            selection: Vec::new(),
            pubsub: PubSubManager::new(),
            config,
            stats: TrackerStats::new(),
            next_sequence: 1,
        }
    }

    /// The current table.
    pub fn value(&self) -> &TabularValue {
        &self.current
    }

    /// Number of rows in the current table.
    pub fn row_count(&self) -> usize {
        self.current.row_count()
    }

    /// The stored selection, in the order it was set.
    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    /// The tracker configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Current activity counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Subscribe to data changes.
    pub fn subscribe<F>(&mut self, callback: F) -> u64
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.watch(Topic::Value, callback)
    }

    /// Subscribe to any topic.
    pub fn watch<F>(&mut self, topic: Topic, callback: F) -> u64
    where
        F: FnMut(&ChangeEvent) + Send + 'static,
    {
        self.pubsub.subscribe(topic, Box::new(callback))
    }

    /// Remove a subscription.
    pub fn unsubscribe(&mut self, subscription_id: u64) -> Result<(), Error> {
        self.pubsub.unsubscribe(subscription_id)
    }

    /// Get the number of active subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.pubsub.subscription_count()
    }

    /// Apply a partial or full column update.
    ///
    /// Every referenced column must exist and carry exactly `row_count`
    /// cells of the column's type, otherwise the whole patch is rejected
    /// with [`Error::SchemaMismatch`] and nothing is modified. When every
    /// referenced column matches the stored cells the call is a no-op.
    /// Otherwise the differing columns are replaced and exactly one event
    /// is published.
    ///
    /// Returns whether the table changed.
    pub fn replace(&mut self, patch: DataPatch) -> Result<bool, Error> {
        let nan_equal = self.config.nan_equal;
        let mut seen = HashSet::new();
        let mut changed: Vec<(String, Vec<Value>)> = Vec::new();

        for (name, values) in patch {
            if !seen.insert(name.clone()) {
                return Err(self.reject(Error::SchemaMismatch(format!(
                    "column {} appears more than once",
                    name
                ))));
            }

            let values = match self.current.conform(&name, values) {
                Ok(values) => values,
                Err(err) => return Err(self.reject(Error::schema(err))),
            };

            let unchanged = self
                .current
                .column(&name)
                .is_some_and(|stored| cells_equal(&stored.values, &values, nan_equal));
            if !unchanged {
                changed.push((name, values));
            }
        }

        if changed.is_empty() {
            self.stats.record_noop();
            trace!(columns = seen.len(), "replace matched stored data");
            return Ok(false);
        }

        let mut next = self.current.clone();
        let mut changed_columns = Vec::with_capacity(changed.len());
        for (name, values) in changed {
            next.set_column(&name, values).map_err(Error::schema)?;
            changed_columns.push(name);
        }

        let old = std::mem::replace(&mut self.current, next);
        self.stats.record_replace();

        debug!(
            changed = ?changed_columns,
            rows = self.current.row_count(),
            "table data changed"
        );

        let event = ChangeEvent::value(
            self.take_sequence(),
            old,
            self.current.clone(),
            changed_columns,
        );
        self.publish(&event);

        Ok(true)
    }

    /// Build a table from the rows at `indices`, in the given order.
    ///
    /// Duplicates are allowed. Fails with [`Error::IndexOutOfRange`] on the
    /// first index past the last row.
    pub fn select(&self, indices: &[usize]) -> Result<TabularValue, Error> {
        self.current
            .take(indices)
            .map_err(|index| Error::IndexOutOfRange {
                index,
                row_count: self.current.row_count(),
            })
    }

    /// Replace the stored selection.
    ///
    /// Publishes one selection event when the stored selection changes.
    /// Returns whether it did.
    pub fn set_selection(&mut self, indices: Vec<usize>) -> Result<bool, Error> {
        let row_count = self.current.row_count();
        if let Some(&index) = indices.iter().find(|&&i| i >= row_count) {
            return Err(self.reject(Error::IndexOutOfRange { index, row_count }));
        }

        if indices == self.selection {
            return Ok(false);
        }

        let old = std::mem::replace(&mut self.selection, indices);
        self.stats.record_selection();
        debug!(selection = ?self.selection, "selection changed");

        let event = ChangeEvent::selection(self.take_sequence(), old, self.selection.clone());
        self.publish(&event);

        Ok(true)
    }

    /// The rows named by the stored selection.
    pub fn selected(&self) -> TabularValue {
        // Selections are validated on write and replace never changes the
        // row count, so the stored indices are always in range.
        self.current.take(&self.selection).unwrap_or_default()
    }

    /// Column display and edit policies for the current table.
    pub fn layout(&self, options: &ColumnOptions) -> ColumnLayout {
        ColumnLayout::build(&self.current, self.config.index_column.as_deref(), options)
    }

    fn take_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    fn publish(&mut self, event: &ChangeEvent) {
        let delivered = self.pubsub.publish(event);
        self.stats.record_event(delivered);
    }

    fn reject(&self, err: Error) -> Error {
        self.stats.record_rejected();
        warn!(error = %err, "update rejected");
        err
    }
}

fn cells_equal(stored: &[Value], proposed: &[Value], nan_equal: bool) -> bool {
    stored.len() == proposed.len()
        && stored
            .iter()
            .zip(proposed)
            .all(|(a, b)| a.same_as(b, nan_equal))
}
