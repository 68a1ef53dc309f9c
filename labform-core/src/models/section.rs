use serde::{Deserialize, Serialize};
use std::fmt;

use super::column::Column;
use super::row::Row;
use super::table::TableState;

/// Name of one sub-form within a record, e.g. `joints` or `filler_metals`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionName(String);

impl SectionName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionName {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for SectionName {
    fn from(v: String) -> Self {
        Self(v)
    }
}

/// Descriptor of a file attached to a section. The bytes themselves go
/// through the upload service; only the descriptor lives in the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

impl AttachedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size,
        }
    }
}

/// What the parent form stores under a section name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionEntry {
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<AttachedFile>,
}

impl SectionEntry {
    pub fn from_table(table: TableState) -> Self {
        Self {
            columns: table.columns,
            rows: table.rows,
            design_photo_url: None,
            files: Vec::new(),
        }
    }

    pub fn table(&self) -> TableState {
        TableState::new(self.columns.clone(), self.rows.clone())
    }

    pub fn has_attachments(&self) -> bool {
        self.design_photo_url.is_some() || !self.files.is_empty()
    }

    /// True when something was entered: a non-empty cell under an editable
    /// column, or an attachment. Fixed labels are template text, not data.
    pub fn has_data(&self) -> bool {
        let editable: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| !c.is_fixed_label())
            .map(|c| c.accessor_key.as_str())
            .collect();
        let entered = self
            .rows
            .iter()
            .any(|row| editable.iter().any(|key| !row.get(key).is_empty()));
        entered || self.has_attachments()
    }
}

impl From<TableState> for SectionEntry {
    fn from(table: TableState) -> Self {
        Self::from_table(table)
    }
}
