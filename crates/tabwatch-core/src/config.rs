//! Tracker configuration.

use serde::{Deserialize, Serialize};

/// Default title of the row-index column in column layouts.
pub const DEFAULT_INDEX_COLUMN: &str = "index";

/// Configuration for a [`ChangeTracker`](crate::ChangeTracker).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Treat two NaN floats as equal during change detection.
    pub nan_equal: bool,

    /// Title of the leading row-index column. None hides it.
    pub index_column: Option<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            nan_equal: true,
            index_column: Some(DEFAULT_INDEX_COLUMN.to_string()),
        }
    }
}

impl TrackerConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set NaN equality.
    pub fn with_nan_equal(mut self, nan_equal: bool) -> Self {
        self.nan_equal = nan_equal;
        self
    }

    /// Set the row-index column title.
    pub fn with_index_column(mut self, title: impl Into<String>) -> Self {
        self.index_column = Some(title.into());
        self
    }

    /// Hide the row-index column.
    pub fn without_index_column(mut self) -> Self {
        self.index_column = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert!(config.nan_equal);
        assert_eq!(config.index_column.as_deref(), Some("index"));
    }

    #[test]
    fn test_builder() {
        let config = TrackerConfig::new()
            .with_nan_equal(false)
            .without_index_column();
        assert!(!config.nan_equal);
        assert!(config.index_column.is_none());

        let config = config.with_index_column("row");
        assert_eq!(config.index_column.as_deref(), Some("row"));
    }

    #[test]
    fn test_partial_json() {
        let config: TrackerConfig = serde_json::from_str(r#"{"nan_equal": false}"#).unwrap();
        assert!(!config.nan_equal);
        assert_eq!(config.index_column.as_deref(), Some("index"));
    }
}
