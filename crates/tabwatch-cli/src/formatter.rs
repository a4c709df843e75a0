//! Output formatters for tables, replay reports and column layouts.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use tabwatch_core::{CellEditor, CellFormatter, ColumnLayout};
use tabwatch_proto::{TabularValue, Value};

use crate::commands::{EditOutcome, ReplayReport};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format a table.
    fn format_table(&self, table: &TabularValue) -> String;

    /// Format a replay report.
    fn format_replay(&self, report: &ReplayReport) -> String;

    /// Format a column layout.
    fn format_layout(&self, layout: &ColumnLayout) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_table(&self, table: &TabularValue) -> String {
        let mut out = Table::new();
        out.set_header(table.column_names());

        for row in table.rows() {
            out.add_row(row.into_iter().map(|v| Cell::new(v.to_string())));
        }

        format!("{}\n{} row(s)", out, table.row_count())
    }

    fn format_replay(&self, report: &ReplayReport) -> String {
        let mut output = String::new();

        for outcome in &report.outcomes {
            let line = match outcome {
                EditOutcome::Changed { edit, event } => format!(
                    "edit {}: changed {} (event {})",
                    edit,
                    event.changed_columns().join(", "),
                    event.sequence
                ),
                EditOutcome::Unchanged { edit } => format!("edit {}: no change", edit),
                EditOutcome::Rejected { edit, error } => {
                    format!("edit {}: rejected: {}", edit, error)
                }
            };
            output.push_str(&line);
            output.push('\n');
        }

        output.push_str(&format!(
            "{} event(s) published\n\n",
            report.stats.events_published
        ));
        output.push_str(&self.format_table(&report.table));
        output
    }

    fn format_layout(&self, layout: &ColumnLayout) -> String {
        let mut table = Table::new();
        table.set_header(vec!["Field", "Title", "Type", "Formatter", "Editor"]);

        for spec in layout.columns() {
            table.add_row(vec![
                spec.field.clone(),
                spec.title.clone(),
                spec.column_type.to_string(),
                describe_formatter(&spec.formatter),
                describe_editor(&spec.editor),
            ]);
        }

        table.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_table(&self, table: &TabularValue) -> String {
        serde_json::to_string_pretty(table).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_replay(&self, report: &ReplayReport) -> String {
        let edits: Vec<serde_json::Value> = report
            .outcomes
            .iter()
            .map(|outcome| {
                let mut obj = serde_json::json!({
                    "edit": outcome.edit(),
                    "outcome": outcome.label(),
                });
                match outcome {
                    EditOutcome::Changed { event, .. } => {
                        obj["sequence"] = event.sequence.into();
                        obj["changed_columns"] = event.changed_columns().into();
                    }
                    EditOutcome::Rejected { error, .. } => {
                        obj["error"] = error.as_str().into();
                    }
                    EditOutcome::Unchanged { .. } => {}
                }
                obj
            })
            .collect();

        let report = serde_json::json!({
            "edits": edits,
            "events_published": report.stats.events_published,
            "table": report.table,
        });
        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_layout(&self, layout: &ColumnLayout) -> String {
        serde_json::to_string_pretty(layout.columns()).unwrap_or_else(|_| "[]".to_string())
    }
}

/// CSV formatter.
pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_table(&self, table: &TabularValue) -> String {
        let header: Vec<String> = table
            .column_names()
            .into_iter()
            .map(|name| format!("\"{}\"", escape_csv(name)))
            .collect();
        let mut output = header.join(",");
        output.push('\n');

        for row in table.rows() {
            let cells: Vec<String> = row.into_iter().map(format_value_csv).collect();
            output.push_str(&cells.join(","));
            output.push('\n');
        }

        output
    }

    fn format_replay(&self, report: &ReplayReport) -> String {
        let mut output = String::from("edit,outcome,detail\n");

        for outcome in &report.outcomes {
            let detail = match outcome {
                EditOutcome::Changed { event, .. } => event.changed_columns().join(" "),
                EditOutcome::Unchanged { .. } => String::new(),
                EditOutcome::Rejected { error, .. } => error.clone(),
            };
            output.push_str(&format!(
                "{},{},\"{}\"\n",
                outcome.edit(),
                outcome.label(),
                escape_csv(&detail)
            ));
        }

        output
    }

    fn format_layout(&self, layout: &ColumnLayout) -> String {
        let mut output = String::from("field,title,type,formatter,editor\n");
        for spec in layout.columns() {
            output.push_str(&format!(
                "\"{}\",\"{}\",{},\"{}\",\"{}\"\n",
                escape_csv(&spec.field),
                escape_csv(&spec.title),
                spec.column_type,
                escape_csv(&describe_formatter(&spec.formatter)),
                escape_csv(&describe_editor(&spec.editor)),
            ));
        }
        output
    }
}

fn describe_formatter(formatter: &CellFormatter) -> String {
    match formatter {
        CellFormatter::Number { format } => format!("number({})", format),
        CellFormatter::String => "string".to_string(),
        CellFormatter::Boolean => "boolean".to_string(),
    }
}

fn describe_editor(editor: &CellEditor) -> String {
    match editor {
        CellEditor::Int { step } => format!("int(step={})", step),
        CellEditor::Number { step } => format!("number(step={})", step),
        CellEditor::String => "string".to_string(),
        CellEditor::Select { options } => format!("select({})", options.join("|")),
        CellEditor::Checkbox => "checkbox".to_string(),
    }
}

/// Format a Value for CSV output.
fn format_value_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => format!("\"{}\"", escape_csv(s)),
        _ => value.to_string(),
    }
}

/// Escape a string for CSV.
fn escape_csv(s: &str) -> String {
    s.replace('"', "\"\"")
}
