//! tabwatch core - change detection and notification for tabular values.
//!
//! A [`ChangeTracker`] owns a table, accepts partial column updates, and
//! notifies subscribers exactly once per update that changes what a viewer
//! would see. It also provides positional row selection and per-column
//! display policies for the table widgets that watch it.

pub mod columns;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pubsub;
pub mod shared;
pub mod tracker;

pub use columns::{CellEditor, CellFormatter, ColumnLayout, ColumnOptions, ColumnSpec};
pub use config::TrackerConfig;
pub use error::Error;
pub use metrics::{StatsSnapshot, TrackerStats};
pub use pubsub::{Callback, PubSubManager, SubscriptionEntry};
pub use shared::SharedTracker;
pub use tracker::ChangeTracker;

/// Re-export data types.
pub use tabwatch_proto as proto;
