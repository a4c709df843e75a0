//! Column display and edit policies.
//!
//! A table widget shows one column per table column plus a leading row
//! index. Each displayed column gets a formatter and an editor, chosen by
//! the column's logical type unless the caller overrides them by name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use tabwatch_proto::{ColumnType, TabularValue};

/// Default number format for integer columns.
pub const INT_FORMAT: &str = "0,0";

/// Default number format for float columns.
pub const FLOAT_FORMAT: &str = "0,0.0[00000]";

/// How a column's cells are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CellFormatter {
    /// Numeric rendering with a format pattern.
    Number { format: String },
    /// Plain text.
    String,
    /// Tick or cross.
    Boolean,
}

impl CellFormatter {
    /// The formatter used for a column type when none is configured.
    pub fn default_for(ty: ColumnType) -> Self {
        match ty {
            ColumnType::Int => CellFormatter::Number {
                format: INT_FORMAT.to_string(),
            },
            ColumnType::Float => CellFormatter::Number {
                format: FLOAT_FORMAT.to_string(),
            },
            ColumnType::String => CellFormatter::String,
            ColumnType::Bool => CellFormatter::Boolean,
        }
    }
}

/// How a column's cells are edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CellEditor {
    /// Integer spinner.
    Int { step: i64 },
    /// Float spinner.
    Number { step: f64 },
    /// Free text.
    String,
    /// Choice from a fixed list.
    Select { options: Vec<String> },
    /// Boolean toggle.
    Checkbox,
}

impl CellEditor {
    /// The editor used for a column type when none is configured.
    pub fn default_for(ty: ColumnType) -> Self {
        match ty {
            ColumnType::Int => CellEditor::Int { step: 1 },
            ColumnType::Float => CellEditor::Number { step: 0.1 },
            ColumnType::String => CellEditor::String,
            ColumnType::Bool => CellEditor::Checkbox,
        }
    }
}

/// Per-column overrides, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    pub formatters: HashMap<String, CellFormatter>,
    pub editors: HashMap<String, CellEditor>,
    pub titles: HashMap<String, String>,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formatter(mut self, column: impl Into<String>, formatter: CellFormatter) -> Self {
        self.formatters.insert(column.into(), formatter);
        self
    }

    pub fn with_editor(mut self, column: impl Into<String>, editor: CellEditor) -> Self {
        self.editors.insert(column.into(), editor);
        self
    }

    pub fn with_title(mut self, column: impl Into<String>, title: impl Into<String>) -> Self {
        self.titles.insert(column.into(), title.into());
        self
    }
}

/// Resolved policies for one displayed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Source column name, or the index title for the row-index column.
    pub field: String,
    /// Header text.
    pub title: String,
    /// Logical type of the cells.
    pub column_type: ColumnType,
    pub formatter: CellFormatter,
    pub editor: CellEditor,
}

impl ColumnSpec {
    fn resolve(field: &str, column_type: ColumnType, options: &ColumnOptions) -> Self {
        Self {
            field: field.to_string(),
            title: options
                .titles
                .get(field)
                .cloned()
                .unwrap_or_else(|| field.to_string()),
            column_type,
            formatter: options
                .formatters
                .get(field)
                .cloned()
                .unwrap_or_else(|| CellFormatter::default_for(column_type)),
            editor: options
                .editors
                .get(field)
                .cloned()
                .unwrap_or_else(|| CellEditor::default_for(column_type)),
        }
    }
}

/// The ordered column policies for a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    columns: Vec<ColumnSpec>,
}

impl ColumnLayout {
    /// Resolve policies for `table`, with a leading integer row-index
    /// column when `index_column` is set.
    pub fn build(table: &TabularValue, index_column: Option<&str>, options: &ColumnOptions) -> Self {
        let mut columns = Vec::with_capacity(table.column_count() + 1);

        if let Some(index) = index_column {
            columns.push(ColumnSpec::resolve(index, ColumnType::Int, options));
        }
        for column in table.columns() {
            columns.push(ColumnSpec::resolve(&column.name, column.column_type(), options));
        }

        Self { columns }
    }

    /// All column specs in display order.
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Find a spec by field name.
    pub fn column(&self, field: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Number of displayed columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if no columns are displayed.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
