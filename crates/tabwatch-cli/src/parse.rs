//! Parsers for column override arguments.
//!
//! Overrides take the form `column=kind[:argument]`, for example
//! `str=select:A|B|C` or `float=number:0.0000`.

use tabwatch_core::{CellEditor, CellFormatter, ColumnOptions};

use crate::error::Error;

/// Split `column=spec` into its parts.
fn split_assignment(arg: &str) -> Result<(&str, &str), Error> {
    match arg.split_once('=') {
        Some((column, spec)) if !column.is_empty() && !spec.is_empty() => Ok((column, spec)),
        _ => Err(Error::InvalidArgument(format!(
            "expected column=value, got '{}'",
            arg
        ))),
    }
}

/// Parse an editor spec: `int[:step]`, `number[:step]`, `string`,
/// `select:a|b|c` or `checkbox`.
pub fn parse_editor(spec: &str) -> Result<CellEditor, Error> {
    let (kind, arg) = match spec.split_once(':') {
        Some((kind, arg)) => (kind, Some(arg)),
        None => (spec, None),
    };

    let invalid = || Error::InvalidArgument(format!("invalid editor '{}'", spec));

    match (kind, arg) {
        ("int", None) => Ok(CellEditor::Int { step: 1 }),
        ("int", Some(step)) => step
            .parse()
            .map(|step| CellEditor::Int { step })
            .map_err(|_| invalid()),
        ("number", None) => Ok(CellEditor::Number { step: 0.1 }),
        ("number", Some(step)) => step
            .parse()
            .map(|step| CellEditor::Number { step })
            .map_err(|_| invalid()),
        ("string", None) => Ok(CellEditor::String),
        ("checkbox", None) => Ok(CellEditor::Checkbox),
        ("select", Some(options)) if !options.is_empty() => Ok(CellEditor::Select {
            options: options.split('|').map(str::to_string).collect(),
        }),
        _ => Err(invalid()),
    }
}

/// Parse a formatter spec: `number:<format>`, `string` or `boolean`.
pub fn parse_formatter(spec: &str) -> Result<CellFormatter, Error> {
    match spec.split_once(':') {
        Some(("number", format)) if !format.is_empty() => Ok(CellFormatter::Number {
            format: format.to_string(),
        }),
        None if spec == "string" => Ok(CellFormatter::String),
        None if spec == "boolean" => Ok(CellFormatter::Boolean),
        _ => Err(Error::InvalidArgument(format!(
            "invalid formatter '{}'",
            spec
        ))),
    }
}

/// Build column options from repeated `--editor`, `--formatter` and
/// `--title` arguments.
pub fn column_options(
    editors: &[String],
    formatters: &[String],
    titles: &[String],
) -> Result<ColumnOptions, Error> {
    let mut options = ColumnOptions::new();

    for arg in editors {
        let (column, spec) = split_assignment(arg)?;
        options = options.with_editor(column, parse_editor(spec)?);
    }
    for arg in formatters {
        let (column, spec) = split_assignment(arg)?;
        options = options.with_formatter(column, parse_formatter(spec)?);
    }
    for arg in titles {
        let (column, title) = split_assignment(arg)?;
        options = options.with_title(column, title);
    }

    Ok(options)
}
