//! Pure transition functions over [`TableState`].
//!
//! Missing ids never error: deletes become no-ops and anchored inserts fall
//! back to appending at the end.

use tracing::debug;

use super::action::{Anchor, ColumnChange, Side, TableAction};
use crate::ids::IdSource;
use crate::models::{CellValue, Column, ColumnKind, Row, RowId, TableState};

/// Why an action left the state untouched on purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Fixed-label columns carry the row captions and cannot be deleted.
    FixedLabelColumn(String),
    /// The accessor key is not part of the current schema.
    UnknownAccessorKey(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::FixedLabelColumn(id) => {
                write!(f, "Column '{}' is a fixed label column and cannot be deleted", id)
            }
            Rejection::UnknownAccessorKey(key) => {
                write!(f, "No column reads or writes the key '{}'", key)
            }
        }
    }
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TableState,
    pub changed: bool,
    pub rejected: Option<Rejection>,
}

impl Transition {
    fn changed(state: TableState) -> Self {
        Self {
            state,
            changed: true,
            rejected: None,
        }
    }

    fn unchanged(state: &TableState) -> Self {
        Self {
            state: state.clone(),
            changed: false,
            rejected: None,
        }
    }

    fn rejected(state: &TableState, reason: Rejection) -> Self {
        Self {
            state: state.clone(),
            changed: false,
            rejected: Some(reason),
        }
    }
}

impl TableState {
    /// Applies `action`, returning the next state. `self` is left untouched.
    pub fn apply(&self, action: &TableAction, ids: &mut dyn IdSource) -> Transition {
        match action {
            TableAction::AddColumn { name, kind, anchor } => {
                self.add_column(name, *kind, anchor.as_ref(), ids)
            }
            TableAction::DeleteColumn { column_id } => self.delete_column(column_id),
            TableAction::UpdateColumn { column_id, change } => {
                self.update_column(column_id, change)
            }
            TableAction::AddRow { after } => self.add_row(after.as_ref(), ids),
            TableAction::DeleteRow { row_id } => self.delete_row(row_id),
            TableAction::EditCell {
                row_id,
                accessor_key,
                value,
            } => self.edit_cell(row_id, accessor_key, value),
        }
    }

    fn add_column(
        &self,
        name: &str,
        kind: ColumnKind,
        anchor: Option<&Anchor>,
        ids: &mut dyn IdSource,
    ) -> Transition {
        let mut key = ids.column_key(name);
        while self.column(&key).is_some() || self.column_by_key(&key).is_some() {
            key = ids.column_key(name);
        }

        let index = match anchor {
            None => self.columns.len(),
            Some(anchor) => match self.column_index(&anchor.relative_to) {
                Some(i) if anchor.side == Side::Before => i,
                Some(i) => i + 1,
                None => {
                    debug!(anchor = %anchor.relative_to, "anchor column not found, appending");
                    self.columns.len()
                }
            },
        };

        let mut next = self.clone();
        next.columns
            .insert(index, Column::new(key.clone(), name.trim(), kind));
        for row in &mut next.rows {
            row.cells.insert(key.clone(), CellValue::Empty);
        }
        Transition::changed(next)
    }

    fn delete_column(&self, column_id: &str) -> Transition {
        let Some(index) = self.column_index(column_id) else {
            return Transition::unchanged(self);
        };
        if self.columns[index].is_fixed_label() {
            return Transition::rejected(self, Rejection::FixedLabelColumn(column_id.to_string()));
        }

        let mut next = self.clone();
        let removed = next.columns.remove(index);
        // Predefined columns may share a key; only strip it once nothing reads it.
        if next.column_by_key(&removed.accessor_key).is_none() {
            for row in &mut next.rows {
                row.cells.remove(&removed.accessor_key);
            }
        }
        Transition::changed(next)
    }

    fn update_column(&self, column_id: &str, change: &ColumnChange) -> Transition {
        let Some(index) = self.column_index(column_id) else {
            return Transition::unchanged(self);
        };

        let current = &self.columns[index];
        let same = match change {
            ColumnChange::Header(header) => &current.header == header,
            ColumnChange::Placeholder(placeholder) => &current.placeholder == placeholder,
            ColumnChange::Kind(kind) => &current.kind == kind,
        };
        if same {
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        let column = &mut next.columns[index];
        match change {
            ColumnChange::Header(header) => column.header = header.clone(),
            ColumnChange::Placeholder(placeholder) => column.placeholder = placeholder.clone(),
            ColumnChange::Kind(kind) => column.kind = *kind,
        }
        Transition::changed(next)
    }

    fn add_row(&self, after: Option<&RowId>, ids: &mut dyn IdSource) -> Transition {
        let mut id = ids.row_id();
        while self.row_index(&id).is_some() {
            id = ids.row_id();
        }

        let mut row = Row::new(id);
        for column in &self.columns {
            row.cells
                .insert(column.accessor_key.clone(), CellValue::Empty);
        }

        let index = match after {
            None => self.rows.len(),
            Some(after) => match self.row_index(after) {
                Some(i) => i + 1,
                None => {
                    debug!(anchor = %after, "anchor row not found, appending");
                    self.rows.len()
                }
            },
        };

        let mut next = self.clone();
        next.rows.insert(index, row);
        Transition::changed(next)
    }

    fn delete_row(&self, row_id: &RowId) -> Transition {
        let Some(index) = self.row_index(row_id) else {
            return Transition::unchanged(self);
        };
        let mut next = self.clone();
        next.rows.remove(index);
        Transition::changed(next)
    }

    fn edit_cell(&self, row_id: &RowId, accessor_key: &str, value: &CellValue) -> Transition {
        let Some(index) = self.row_index(row_id) else {
            return Transition::unchanged(self);
        };
        if self.column_by_key(accessor_key).is_none() {
            return Transition::rejected(
                self,
                Rejection::UnknownAccessorKey(accessor_key.to_string()),
            );
        }

        let row = &self.rows[index];
        if row.contains_key(accessor_key) && row.get(accessor_key) == value {
            return Transition::unchanged(self);
        }

        let mut next = self.clone();
        next.rows[index]
            .cells
            .insert(accessor_key.to_string(), value.clone());
        Transition::changed(next)
    }
}
