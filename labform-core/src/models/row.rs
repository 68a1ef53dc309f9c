use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::value::CellValue;

/// Stable row identifier, assigned once when the row is created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for RowId {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// One record of a section table: a sparse map from accessor key to value.
///
/// Serialized flat, e.g. `{"id": "r1", "label": "Joint Design", "value": ""}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(flatten)]
    pub cells: BTreeMap<String, CellValue>,
}

static EMPTY: CellValue = CellValue::Empty;

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(key.into(), value.into());
        self
    }

    /// Value under `key`; absent keys read as empty.
    pub fn get(&self, key: &str) -> &CellValue {
        self.cells.get(key).unwrap_or(&EMPTY)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.cells.contains_key(key)
    }

    pub fn has_data(&self) -> bool {
        self.cells.values().any(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_key_reads_empty() {
        let row = Row::new("r1").with_cell("label", "Joint Design");
        assert_eq!(row.get("label"), &CellValue::Text("Joint Design".into()));
        assert_eq!(row.get("value"), &CellValue::Empty);
        assert!(!row.contains_key("value"));
        assert!(row.has_data());
    }

    #[test]
    fn test_row_json_is_flat() {
        let row = Row::new("r1")
            .with_cell("label", "Joint Design")
            .with_cell("value", "");
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "r1", "label": "Joint Design", "value": ""})
        );

        let parsed: Row = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, row);
    }
}
