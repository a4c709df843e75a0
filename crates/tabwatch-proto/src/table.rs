//! Column-oriented table values.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::value::{ColumnType, Value};

/// A named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnData {
    /// Column name.
    pub name: String,
    /// Declared logical type. Resolved during table construction when absent.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub dtype: Option<ColumnType>,
    /// Values for each row.
    pub values: Vec<Value>,
}

impl ColumnData {
    /// Create a new column whose type is inferred from its cells.
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype: None,
            values,
        }
    }

    /// Create a column with an explicit type.
    pub fn typed(name: impl Into<String>, dtype: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            dtype: Some(dtype),
            values,
        }
    }

    /// The column's logical type.
    ///
    /// Columns inside a [`TabularValue`] always carry a resolved type; a
    /// detached column without one reports `String`.
    pub fn column_type(&self) -> ColumnType {
        self.dtype.unwrap_or(ColumnType::String)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn resolve(mut self) -> Result<Self, Error> {
        let dtype = match self.dtype {
            Some(dtype) => dtype,
            None => infer_type(&self.name, &self.values)?,
        };
        self.values = conform_values(&self.name, dtype, self.values)?;
        self.dtype = Some(dtype);
        Ok(self)
    }
}

/// Infer a column type from its non-null cells.
///
/// Mixed integer and float cells resolve to `Float`; an all-null column
/// resolves to `String`.
fn infer_type(column: &str, values: &[Value]) -> Result<ColumnType, Error> {
    let mut inferred: Option<ColumnType> = None;

    for (row, value) in values.iter().enumerate() {
        let Some(ty) = value.column_type() else {
            continue;
        };
        inferred = match inferred {
            None => Some(ty),
            Some(current) if current == ty => Some(current),
            Some(current) if current.is_numeric() && ty.is_numeric() => Some(ColumnType::Float),
            Some(current) => {
                return Err(Error::TypeMismatch {
                    column: column.to_string(),
                    row,
                    expected: current,
                    actual: ty,
                });
            }
        };
    }

    Ok(inferred.unwrap_or(ColumnType::String))
}

fn conform_values(column: &str, dtype: ColumnType, values: Vec<Value>) -> Result<Vec<Value>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.coerce_to(dtype).ok_or_else(|| Error::TypeMismatch {
                column: column.to_string(),
                row,
                expected: dtype,
                // coerce_to only fails for non-null cells
                actual: value.column_type().unwrap_or(ColumnType::String),
            })
        })
        .collect()
}

/// An in-memory table: named, equal-length, typed columns.
///
/// Uses column-oriented storage. Construction validates that names are
/// unique, lengths agree, and every non-null cell matches its column type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "TableRepr")]
pub struct TabularValue {
    columns: Vec<ColumnData>,
}

#[derive(Deserialize)]
struct TableRepr {
    columns: Vec<ColumnData>,
}

impl TryFrom<TableRepr> for TabularValue {
    type Error = Error;

    fn try_from(repr: TableRepr) -> Result<Self, Self::Error> {
        TabularValue::new(repr.columns)
    }
}

impl TabularValue {
    /// Build a table from columns, validating the table invariants.
    pub fn new(columns: Vec<ColumnData>) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        let expected = columns.first().map(ColumnData::len).unwrap_or(0);

        let mut resolved = Vec::with_capacity(columns.len());
        for column in columns {
            if !seen.insert(column.name.clone()) {
                return Err(Error::DuplicateColumn(column.name));
            }
            let actual = column.len();
            if actual != expected {
                return Err(Error::LengthMismatch {
                    column: column.name,
                    expected,
                    actual,
                });
            }
            resolved.push(column.resolve()?);
        }

        Ok(Self { columns: resolved })
    }

    /// Create a table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Render the table as JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// All columns in order.
    pub fn columns(&self) -> &[ColumnData] {
        &self.columns
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(ColumnData::len).unwrap_or(0)
    }

    /// Check if this table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Get the value at a specific row and column.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    /// Iterate over rows as cell slices in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }

    /// Check a proposed replacement for one column and return it conformed
    /// to the column's type.
    pub fn conform(&self, name: &str, values: Vec<Value>) -> Result<Vec<Value>, Error> {
        let column = self
            .column(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;

        if values.len() != self.row_count() {
            return Err(Error::LengthMismatch {
                column: name.to_string(),
                expected: self.row_count(),
                actual: values.len(),
            });
        }

        conform_values(name, column.column_type(), values)
    }

    /// Replace one column's cells wholesale.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<(), Error> {
        let values = self.conform(name, values)?;
        if let Some(column) = self.columns.iter_mut().find(|c| c.name == name) {
            column.values = values;
        }
        Ok(())
    }

    /// Build a new table from the rows at `indices`, in order.
    ///
    /// Duplicates are allowed. On failure returns the first out-of-range
    /// index.
    pub fn take(&self, indices: &[usize]) -> Result<TabularValue, usize> {
        let row_count = self.row_count();
        if let Some(&bad) = indices.iter().find(|&&i| i >= row_count) {
            return Err(bad);
        }

        let columns = self
            .columns
            .iter()
            .map(|c| ColumnData {
                name: c.name.clone(),
                dtype: c.dtype,
                values: indices.iter().map(|&i| c.values[i].clone()).collect(),
            })
            .collect();

        Ok(TabularValue { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TabularValue {
        TabularValue::new(vec![
            ColumnData::new("int", vec![1.into(), 2.into(), 3.into()]),
            ColumnData::new("float", vec![0.5.into(), 1.5.into(), 2.5.into()]),
            ColumnData::new("str", vec!["A".into(), "B".into(), "C".into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_resolves_types() {
        let table = sample();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.column("int").unwrap().column_type(), ColumnType::Int);
        assert_eq!(table.column("float").unwrap().column_type(), ColumnType::Float);
        assert_eq!(table.column("str").unwrap().column_type(), ColumnType::String);
        assert_eq!(table.column_names(), vec!["int", "float", "str"]);
    }

    #[test]
    fn test_mixed_numeric_widens() {
        let table =
            TabularValue::new(vec![ColumnData::new("x", vec![1.into(), 2.5.into(), Value::Null])])
                .unwrap();
        let column = table.column("x").unwrap();
        assert_eq!(column.column_type(), ColumnType::Float);
        assert_eq!(column.values, vec![Value::Float(1.0), Value::Float(2.5), Value::Null]);
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = TabularValue::new(vec![
            ColumnData::new("a", vec![1.into()]),
            ColumnData::new("a", vec![2.into()]),
        ])
        .unwrap_err();
        assert_eq!(err, Error::DuplicateColumn("a".into()));
    }

    #[test]
    fn test_unequal_lengths_rejected() {
        let err = TabularValue::new(vec![
            ColumnData::new("a", vec![1.into(), 2.into()]),
            ColumnData::new("b", vec![1.into()]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            Error::LengthMismatch {
                column: "b".into(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_mixed_types_rejected() {
        let err = TabularValue::new(vec![ColumnData::new("a", vec![1.into(), "x".into()])])
            .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { row: 1, .. }));
    }

    #[test]
    fn test_take_rows() {
        let table = sample();
        let picked = table.take(&[2, 0, 2]).unwrap();
        assert_eq!(picked.row_count(), 3);
        assert_eq!(picked.get(0, "str"), Some(&Value::from("C")));
        assert_eq!(picked.get(1, "str"), Some(&Value::from("A")));
        assert_eq!(picked.get(2, "int"), Some(&Value::Int(3)));
        assert_eq!(table.take(&[0, 3]), Err(3));
    }

    #[test]
    fn test_conform() {
        let table = sample();
        assert_eq!(
            table.conform("float", vec![1.into(), 2.into(), 3.into()]).unwrap(),
            vec![Value::Float(1.0), Value::Float(2.0), Value::Float(3.0)]
        );
        assert_eq!(
            table.conform("missing", vec![]).unwrap_err(),
            Error::UnknownColumn("missing".into())
        );
        assert!(matches!(
            table.conform("str", vec!["A".into()]),
            Err(Error::LengthMismatch { .. })
        ));
        assert!(matches!(
            table.conform("int", vec![1.into(), "B".into(), 3.into()]),
            Err(Error::TypeMismatch { row: 1, .. })
        ));
    }

    #[test]
    fn test_json_validates() {
        let table = TabularValue::from_json(
            r#"{"columns":[{"name":"int","values":[1,2]},{"name":"str","values":["A","B"]}]}"#,
        )
        .unwrap();
        assert_eq!(table.row_count(), 2);

        let bad = TabularValue::from_json(
            r#"{"columns":[{"name":"int","values":[1,2]},{"name":"str","values":["A"]}]}"#,
        );
        assert!(matches!(bad, Err(Error::Deserialization(_))));

        let reparsed = TabularValue::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, table);
    }
}
