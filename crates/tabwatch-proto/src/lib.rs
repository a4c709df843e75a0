//! tabwatch data types.
//!
//! This crate defines the values shared by the tracker, its subscribers and
//! external collaborators. All types are serde-serializable; JSON is the
//! interchange format.
//!
//! # Modules
//!
//! - [`value`] - Cell values and logical column types
//! - [`table`] - Column-oriented tables
//! - [`patch`] - Partial column updates
//! - [`event`] - Change notifications
//! - [`error`] - Validation and decoding errors

pub mod error;
pub mod event;
pub mod patch;
pub mod table;
pub mod value;

pub use error::Error;

// Re-export commonly used types at crate root
pub use event::{ChangeEvent, ChangePayload, Topic};
pub use patch::DataPatch;
pub use table::{ColumnData, TabularValue};
pub use value::{ColumnType, Value};
