//! End-to-end tests for the tabwatch binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const TABLE: &str = r#"{
    "columns": [
        {"name": "int", "values": [1, 2, 3]},
        {"name": "float", "values": [0.5, 1.5, 2.5]},
        {"name": "str", "values": ["A", "B", "C"]}
    ]
}"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn tabwatch(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tabwatch"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn json_stdout(output: &Output) -> serde_json::Value {
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_replay_reports_each_edit() {
    let dir = tempfile::tempdir().unwrap();
    let table = write(dir.path(), "table.json", TABLE);
    let edits = write(
        dir.path(),
        "edits.json",
        r#"[
            {"str": ["A", "B", "C"]},
            {"str": ["C", "B", "A"]},
            {"str": ["C", "B", "A"]},
            {"missing": [1, 2, 3]}
        ]"#,
    );

    let output = tabwatch(&[
        "replay",
        "--table",
        table.to_str().unwrap(),
        "--edits",
        edits.to_str().unwrap(),
        "--format",
        "json",
    ]);
    let report = json_stdout(&output);

    let outcomes: Vec<&str> = report["edits"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["outcome"].as_str().unwrap())
        .collect();
    assert_eq!(outcomes, vec!["unchanged", "changed", "unchanged", "rejected"]);
    assert_eq!(report["events_published"], 1);
    assert_eq!(report["table"]["columns"][2]["values"][0], "C");
}

#[test]
fn test_select_rows() {
    let dir = tempfile::tempdir().unwrap();
    let table = write(dir.path(), "table.json", TABLE);

    let output = tabwatch(&[
        "select",
        "--table",
        table.to_str().unwrap(),
        "--rows",
        "0,2",
        "--format",
        "csv",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, "\"int\",\"float\",\"str\"\n1,0.5,\"A\"\n3,2.5,\"C\"\n\n");
}

#[test]
fn test_select_out_of_range_fails() {
    let dir = tempfile::tempdir().unwrap();
    let table = write(dir.path(), "table.json", TABLE);

    let output = tabwatch(&["select", "--table", table.to_str().unwrap(), "--rows", "0,3"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("row index 3 out of range"));
}

#[test]
fn test_columns_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let table = write(dir.path(), "table.json", TABLE);
    let config = write(dir.path(), "config.json", r#"{"index_column": "row"}"#);

    let output = tabwatch(&[
        "columns",
        "--table",
        table.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--editor",
        "str=select:A|B|C",
        "--formatter",
        "float=number:0.0000",
        "--format",
        "json",
    ]);
    let columns = json_stdout(&output);

    assert_eq!(columns[0]["title"], "row");
    assert_eq!(columns[2]["formatter"]["format"], "0.0000");
    assert_eq!(columns[3]["editor"]["type"], "select");
    assert_eq!(columns[3]["editor"]["options"][2], "C");
    assert_eq!(columns[1]["editor"]["type"], "int");
}

#[test]
fn test_invalid_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let table = write(
        dir.path(),
        "table.json",
        r#"{"columns": [{"name": "a", "values": [1]}, {"name": "a", "values": [2]}]}"#,
    );

    let output = tabwatch(&["select", "--table", table.to_str().unwrap(), "--rows", "0"]);

    assert_eq!(output.status.code(), Some(1));
}
