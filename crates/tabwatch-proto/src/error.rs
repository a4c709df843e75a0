//! Protocol error types.

use thiserror::Error;

use crate::value::ColumnType;

/// Errors raised while building or decoding table values.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// A referenced column does not exist.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Two columns share a name.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A column's length disagrees with the table's row count.
    #[error("column {column} has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// A cell does not match its column's logical type.
    #[error("column {column} row {row}: expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        row: usize,
        expected: ColumnType,
        actual: ColumnType,
    },

    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed.
    #[error("deserialization error: {0}")]
    Deserialization(String),
}
