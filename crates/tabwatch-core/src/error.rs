//! Core error types.

use thiserror::Error;

/// Tracker errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A replacement referenced an unknown column, supplied the wrong number
    /// of rows, or carried cells of the wrong type.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A row index was outside the table.
    #[error("row index {index} out of range for {row_count} rows")]
    IndexOutOfRange { index: usize, row_count: usize },

    /// Subscription ID was never issued or already removed.
    #[error("subscription {0} not found")]
    SubscriptionNotFound(u64),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] tabwatch_proto::Error),
}

impl Error {
    /// Wrap a column validation failure as a schema mismatch.
    pub(crate) fn schema(err: tabwatch_proto::Error) -> Self {
        Error::SchemaMismatch(err.to_string())
    }
}
