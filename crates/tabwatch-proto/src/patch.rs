//! Partial column updates.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;
use crate::value::Value;

/// A set of proposed column replacements.
///
/// Each entry replaces one column's full sequence of cells. A patch may
/// cover any subset of a table's columns. In JSON a patch is an object
/// mapping column name to an array of cells; keys keep their document
/// order and repeated keys are kept as separate entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataPatch {
    columns: Vec<(String, Vec<Value>)>,
}

impl DataPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column replacement.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.columns.push((name.into(), values));
        self
    }

    /// Parse a patch from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Iterate over `(column, values)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Names of the referenced columns.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of referenced columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if the patch references no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl IntoIterator for DataPatch {
    type Item = (String, Vec<Value>);
    type IntoIter = std::vec::IntoIter<(String, Vec<Value>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl FromIterator<(String, Vec<Value>)> for DataPatch {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Value>)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for DataPatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, values) in &self.columns {
            map.serialize_entry(name, values)?;
        }
        map.end()
    }
}

struct PatchVisitor;

impl<'de> Visitor<'de> for PatchVisitor {
    type Value = DataPatch;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map of column name to cell array")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DataPatch, A::Error> {
        let mut columns = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, values)) = access.next_entry::<String, Vec<Value>>()? {
            columns.push((name, values));
        }
        Ok(DataPatch { columns })
    }
}

impl<'de> Deserialize<'de> for DataPatch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PatchVisitor)
    }
}
