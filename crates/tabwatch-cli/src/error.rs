//! CLI error types.

use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Input file was not valid JSON for the expected shape.
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    /// Tracker error.
    #[error("{0}")]
    Core(#[from] tabwatch_core::Error),

    /// Table validation error.
    #[error("invalid table: {0}")]
    Proto(#[from] tabwatch_proto::Error),

    /// Malformed command-line argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
