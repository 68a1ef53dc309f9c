use crate::models::{CellValue, ColumnKind, RowId};

/// Which side of the anchor column a new column lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Before,
    After,
}

/// Insertion anchor for a new column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    pub relative_to: String,
    pub side: Side,
}

impl Anchor {
    pub fn before(column_id: impl Into<String>) -> Self {
        Self {
            relative_to: column_id.into(),
            side: Side::Before,
        }
    }

    pub fn after(column_id: impl Into<String>) -> Self {
        Self {
            relative_to: column_id.into(),
            side: Side::After,
        }
    }
}

/// Attribute change on an existing column. Never touches `id` or `accessor_key`.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnChange {
    Header(String),
    Placeholder(Option<String>),
    Kind(ColumnKind),
}

/// A structural or cell-level mutation of a section table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    AddColumn {
        name: String,
        kind: ColumnKind,
        anchor: Option<Anchor>,
    },
    DeleteColumn {
        column_id: String,
    },
    UpdateColumn {
        column_id: String,
        change: ColumnChange,
    },
    AddRow {
        after: Option<RowId>,
    },
    DeleteRow {
        row_id: RowId,
    },
    EditCell {
        row_id: RowId,
        accessor_key: String,
        value: CellValue,
    },
}

impl TableAction {
    /// Plain-text column appended at the end.
    pub fn add_column(name: impl Into<String>) -> Self {
        TableAction::AddColumn {
            name: name.into(),
            kind: ColumnKind::PlainText,
            anchor: None,
        }
    }

    pub fn rename_column(column_id: impl Into<String>, header: impl Into<String>) -> Self {
        TableAction::UpdateColumn {
            column_id: column_id.into(),
            change: ColumnChange::Header(header.into()),
        }
    }

    pub fn delete_column(column_id: impl Into<String>) -> Self {
        TableAction::DeleteColumn {
            column_id: column_id.into(),
        }
    }

    pub fn add_row(after: Option<RowId>) -> Self {
        TableAction::AddRow { after }
    }

    pub fn delete_row(row_id: impl Into<RowId>) -> Self {
        TableAction::DeleteRow {
            row_id: row_id.into(),
        }
    }

    pub fn edit_cell(
        row_id: impl Into<RowId>,
        accessor_key: impl Into<String>,
        value: impl Into<CellValue>,
    ) -> Self {
        TableAction::EditCell {
            row_id: row_id.into(),
            accessor_key: accessor_key.into(),
            value: value.into(),
        }
    }

    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            TableAction::AddColumn { .. } => "add_column",
            TableAction::DeleteColumn { .. } => "delete_column",
            TableAction::UpdateColumn { .. } => "update_column",
            TableAction::AddRow { .. } => "add_row",
            TableAction::DeleteRow { .. } => "delete_row",
            TableAction::EditCell { .. } => "edit_cell",
        }
    }
}
