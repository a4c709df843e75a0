//! Command implementations.

use std::fs;
use std::path::Path;
use std::sync::mpsc;

use tabwatch_core::{ChangeTracker, ColumnLayout, ColumnOptions, StatsSnapshot, TrackerConfig};
use tabwatch_proto::{ChangeEvent, DataPatch, TabularValue};

use crate::error::Error;

/// Result of replaying one edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The edit changed the table and produced this event.
    Changed { edit: usize, event: ChangeEvent },
    /// The edit matched the stored data.
    Unchanged { edit: usize },
    /// The edit was rejected and the table left as it was.
    Rejected { edit: usize, error: String },
}

impl EditOutcome {
    /// 1-based position of the edit in the input.
    pub fn edit(&self) -> usize {
        match self {
            EditOutcome::Changed { edit, .. }
            | EditOutcome::Unchanged { edit }
            | EditOutcome::Rejected { edit, .. } => *edit,
        }
    }

    /// Short outcome label.
    pub fn label(&self) -> &'static str {
        match self {
            EditOutcome::Changed { .. } => "changed",
            EditOutcome::Unchanged { .. } => "unchanged",
            EditOutcome::Rejected { .. } => "rejected",
        }
    }
}

/// Everything a replay run produced.
#[derive(Debug)]
pub struct ReplayReport {
    pub outcomes: Vec<EditOutcome>,
    pub table: TabularValue,
    pub stats: StatsSnapshot,
}

/// Load a table from a JSON file.
pub fn load_table(path: &Path) -> Result<TabularValue, Error> {
    let json = fs::read_to_string(path)?;
    Ok(TabularValue::from_json(&json)?)
}

/// Load a JSON array of patches.
pub fn load_edits(path: &Path) -> Result<Vec<DataPatch>, Error> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Load tracker configuration, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig, Error> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Ok(serde_json::from_str(&json)?)
        }
        None => Ok(TrackerConfig::default()),
    }
}

/// Feed every edit through a tracker and record what each one did.
pub fn replay(table: TabularValue, edits: Vec<DataPatch>, config: TrackerConfig) -> ReplayReport {
    let mut tracker = ChangeTracker::with_config(table, config);

    let (tx, rx) = mpsc::channel();
    tracker.subscribe(move |event| {
        let _ = tx.send(event.clone());
    });

    let mut outcomes = Vec::with_capacity(edits.len());
    for (i, patch) in edits.into_iter().enumerate() {
        let edit = i + 1;
        let result = tracker.replace(patch);
        let outcome = classify(edit, result, rx.try_recv().ok());
        tracing::debug!(edit, outcome = outcome.label(), "edit replayed");
        outcomes.push(outcome);
    }

    ReplayReport {
        outcomes,
        stats: tracker.stats(),
        table: tracker.value().clone(),
    }
}

/// Decide an edit's outcome from the replace result and the event, if any,
/// the subscriber received. A delivered event always means `Changed`; a
/// reported change with nothing delivered is surfaced as a rejection.
fn classify(
    edit: usize,
    result: Result<bool, tabwatch_core::Error>,
    event: Option<ChangeEvent>,
) -> EditOutcome {
    match (result, event) {
        (Err(e), _) => EditOutcome::Rejected {
            edit,
            error: e.to_string(),
        },
        (Ok(_), Some(event)) => EditOutcome::Changed { edit, event },
        (Ok(false), None) => EditOutcome::Unchanged { edit },
        (Ok(true), None) => {
            tracing::warn!(edit, "change reported without an event");
            EditOutcome::Rejected {
                edit,
                error: "table changed but no event was delivered".to_string(),
            }
        }
    }
}

/// Select rows from a table by position.
pub fn select(table: TabularValue, rows: &[usize]) -> Result<TabularValue, Error> {
    let tracker = ChangeTracker::new(table);
    Ok(tracker.select(rows)?)
}

/// Resolve the column layout for a table.
pub fn columns(table: TabularValue, config: TrackerConfig, options: &ColumnOptions) -> ColumnLayout {
    ChangeTracker::with_config(table, config).layout(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabwatch_proto::{ColumnData, Value};

    fn dataframe() -> TabularValue {
        TabularValue::new(vec![
            ColumnData::new("int", vec![1.into(), 2.into(), 3.into()]),
            ColumnData::new("str", vec!["A".into(), "B".into(), "C".into()]),
        ])
        .unwrap()
    }

    fn strs(values: &[&str]) -> Vec<Value> {
        values.iter().map(|&s| s.into()).collect()
    }

    #[test]
    fn test_replay_outcomes() {
        let edits = vec![
            DataPatch::new().with_column("str", strs(&["A", "B", "C"])),
            DataPatch::new().with_column("str", strs(&["C", "B", "A"])),
            DataPatch::new().with_column("nope", strs(&["C", "B", "A"])),
            DataPatch::new().with_column("str", strs(&["C", "B", "A"])),
        ];

        let report = replay(dataframe(), edits, TrackerConfig::default());
        let labels: Vec<&str> = report.outcomes.iter().map(EditOutcome::label).collect();

        assert_eq!(labels, vec!["unchanged", "changed", "rejected", "unchanged"]);
        assert_eq!(report.table.get(0, "str"), Some(&Value::from("C")));
        assert_eq!(report.stats.events_published, 1);
        match &report.outcomes[1] {
            EditOutcome::Changed { event, .. } => assert_eq!(event.sequence, 1),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_classify_change_without_event() {
        assert_eq!(
            classify(4, Ok(true), None),
            EditOutcome::Rejected {
                edit: 4,
                error: "table changed but no event was delivered".to_string(),
            }
        );
        assert_eq!(classify(5, Ok(false), None), EditOutcome::Unchanged { edit: 5 });

        let event = ChangeEvent::selection(7, vec![], vec![0]);
        assert_eq!(
            classify(6, Ok(true), Some(event.clone())),
            EditOutcome::Changed { edit: 6, event }
        );
    }

    #[test]
    fn test_select_command() {
        let picked = select(dataframe(), &[2, 0]).unwrap();
        assert_eq!(picked.get(0, "int"), Some(&Value::Int(3)));
        assert!(matches!(
            select(dataframe(), &[3]),
            Err(Error::Core(tabwatch_core::Error::IndexOutOfRange { .. }))
        ));
    }

    #[test]
    fn test_columns_command() {
        let layout = columns(
            dataframe(),
            TrackerConfig::default(),
            &ColumnOptions::new(),
        );
        assert_eq!(layout.len(), 3);
        assert_eq!(layout.columns()[0].title, "index");
    }
}
