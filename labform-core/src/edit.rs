//! In-place header and cell editing.
//!
//! An [`InlineEdit`] holds an uncommitted draft. Enter or blur commits it
//! into a [`TableAction`]; Escape throws it away and nothing is emitted.

use crate::engine::TableAction;
use crate::models::{ColumnKind, RowId, TableState};

/// What is being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    Header { column_id: String },
    Cell { row_id: RowId, accessor_key: String },
}

/// Keys the inline editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Enter,
    Escape,
    Other,
}

/// Result of feeding a key or focus event to the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditEvent {
    /// Still editing.
    Pending,
    /// Draft committed; apply this action to the table.
    Commit(TableAction),
    /// Draft discarded; display reverts to the committed value.
    Cancel,
}

#[derive(Debug, Clone)]
pub struct InlineEdit {
    target: EditTarget,
    kind: ColumnKind,
    committed: String,
    draft: String,
}

impl InlineEdit {
    /// Starts editing `target` with the current value as the draft. Returns
    /// `None` when the target no longer exists.
    pub fn begin(state: &TableState, target: EditTarget) -> Option<Self> {
        let (kind, committed) = match &target {
            EditTarget::Header { column_id } => {
                let column = state.column(column_id)?;
                (ColumnKind::PlainText, column.header.clone())
            }
            EditTarget::Cell {
                row_id,
                accessor_key,
            } => {
                let row = state.row(row_id)?;
                let column = state.column_by_key(accessor_key)?;
                (column.kind, row.get(accessor_key).display())
            }
        };
        Some(Self {
            target,
            kind,
            draft: committed.clone(),
            committed,
        })
    }

    pub fn target(&self) -> &EditTarget {
        &self.target
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Last committed text, shown again after a cancel.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn input(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn key(&mut self, key: EditKey) -> EditEvent {
        match key {
            EditKey::Enter if self.kind.is_multiline() => {
                self.draft.push('\n');
                EditEvent::Pending
            }
            EditKey::Enter => EditEvent::Commit(self.to_action()),
            EditKey::Escape => {
                self.cancel();
                EditEvent::Cancel
            }
            EditKey::Other => EditEvent::Pending,
        }
    }

    pub fn blur(&mut self) -> EditEvent {
        EditEvent::Commit(self.to_action())
    }

    /// Ends the edit, turning the draft into the matching table action.
    pub fn commit(self) -> TableAction {
        self.to_action()
    }

    pub fn cancel(&mut self) {
        self.draft = self.committed.clone();
    }

    fn to_action(&self) -> TableAction {
        match &self.target {
            EditTarget::Header { column_id } => {
                TableAction::rename_column(column_id.clone(), self.draft.clone())
            }
            EditTarget::Cell {
                row_id,
                accessor_key,
            } => TableAction::EditCell {
                row_id: row_id.clone(),
                accessor_key: accessor_key.clone(),
                value: self.kind.coerce(&self.draft),
            },
        }
    }
}
