use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::column::Column;
use super::row::{Row, RowId};

/// The (columns, rows) pair of one section table.
///
/// Column order is display/tab order and is persisted. Every mutation
/// produces a whole new state, never one half without the other.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableState {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl TableState {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    pub fn column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn column_by_key(&self, accessor_key: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.accessor_key == accessor_key)
    }

    pub fn row_index(&self, row_id: &RowId) -> Option<usize> {
        self.rows.iter().position(|r| &r.id == row_id)
    }

    pub fn row(&self, row_id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == row_id)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.rows.is_empty()
    }

    /// True when at least one row holds a non-empty value.
    pub fn has_data(&self) -> bool {
        self.rows.iter().any(Row::has_data)
    }

    /// Row keys that no column of the schema accesses, in key order.
    pub fn orphan_keys(&self) -> BTreeSet<&str> {
        let keys: BTreeSet<&str> = self
            .columns
            .iter()
            .map(|c| c.accessor_key.as_str())
            .collect();
        self.rows
            .iter()
            .flat_map(|r| r.cells.keys())
            .map(String::as_str)
            .filter(|k| !keys.contains(k))
            .collect()
    }

    /// Column ids that appear more than once.
    pub fn duplicate_column_ids(&self) -> BTreeSet<&str> {
        let mut seen = BTreeSet::new();
        self.columns
            .iter()
            .map(|c| c.id.as_str())
            .filter(|id| !seen.insert(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnKind;

    fn sample() -> TableState {
        TableState::new(
            vec![
                Column::new("label", "Parameter", ColumnKind::FixedLabel),
                Column::new("value", "Value", ColumnKind::PlainText),
            ],
            vec![
                Row::new("r1").with_cell("label", "Joint Design").with_cell("value", ""),
                Row::new("r2").with_cell("stale", "x"),
            ],
        )
    }

    #[test]
    fn test_lookups() {
        let table = sample();
        assert_eq!(table.column_index("value"), Some(1));
        assert_eq!(table.column_index("missing"), None);
        assert_eq!(table.row_index(&RowId::from("r2")), Some(1));
        assert_eq!(table.column_by_key("label").unwrap().header, "Parameter");
    }

    #[test]
    fn test_has_data_and_orphans() {
        let table = sample();
        assert!(table.has_data());
        assert_eq!(table.orphan_keys().into_iter().collect::<Vec<_>>(), vec!["stale"]);
        assert!(TableState::default().is_empty());
        assert!(!TableState::default().has_data());
    }

    #[test]
    fn test_duplicate_column_ids() {
        let mut table = sample();
        table
            .columns
            .push(Column::new("value", "Again", ColumnKind::Numeric));
        assert_eq!(
            table.duplicate_column_ids().into_iter().collect::<Vec<_>>(),
            vec!["value"]
        );
    }
}
