//! Change notifications delivered to subscribers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::table::TabularValue;

/// The event name a subscription listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    /// The table's data changed.
    Value,
    /// The selected rows changed.
    Selection,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Value => write!(f, "value"),
            Topic::Selection => write!(f, "selection"),
        }
    }
}

/// What changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChangePayload {
    /// Table data transition.
    Value {
        old: TabularValue,
        new: TabularValue,
        /// Columns whose cells differ, in patch order.
        changed_columns: Vec<String>,
    },
    /// Selected row transition.
    Selection { old: Vec<usize>, new: Vec<usize> },
}

/// A confirmed change, delivered synchronously to every subscriber of its
/// topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Per-tracker sequence number, starting at 1.
    pub sequence: u64,
    /// The transition.
    pub payload: ChangePayload,
}

impl ChangeEvent {
    /// Create a data change event.
    pub fn value(
        sequence: u64,
        old: TabularValue,
        new: TabularValue,
        changed_columns: Vec<String>,
    ) -> Self {
        Self {
            sequence,
            payload: ChangePayload::Value {
                old,
                new,
                changed_columns,
            },
        }
    }

    /// Create a selection change event.
    pub fn selection(sequence: u64, old: Vec<usize>, new: Vec<usize>) -> Self {
        Self {
            sequence,
            payload: ChangePayload::Selection { old, new },
        }
    }

    /// The topic this event is published on.
    pub fn topic(&self) -> Topic {
        match self.payload {
            ChangePayload::Value { .. } => Topic::Value,
            ChangePayload::Selection { .. } => Topic::Selection,
        }
    }

    /// The table before the change, for data events.
    pub fn old_value(&self) -> Option<&TabularValue> {
        match &self.payload {
            ChangePayload::Value { old, .. } => Some(old),
            _ => None,
        }
    }

    /// The table after the change, for data events.
    pub fn new_value(&self) -> Option<&TabularValue> {
        match &self.payload {
            ChangePayload::Value { new, .. } => Some(new),
            _ => None,
        }
    }

    /// Names of the columns that changed. Empty for selection events.
    pub fn changed_columns(&self) -> &[String] {
        match &self.payload {
            ChangePayload::Value {
                changed_columns, ..
            } => changed_columns,
            _ => &[],
        }
    }
}
