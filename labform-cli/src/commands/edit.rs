use clap::{Args, Subcommand};
use labform_core::{
    Anchor, AttachedFile, ColumnChange, ColumnKind, EditTarget, InlineEdit, RowId, SectionSync,
    TableAction,
};
use std::collections::HashSet;
use std::path::PathBuf;

use super::open_form;
use crate::config::Config;
use crate::store;

/// Edit one section of a record file
#[derive(Args)]
pub struct EditCommand {
    /// Record file
    pub file: PathBuf,

    /// Section name
    pub section: String,

    /// Layout file (defaults to the configured layout)
    #[arg(long)]
    pub layout: Option<PathBuf>,

    #[command(subcommand)]
    pub action: EditSubcommand,
}

#[derive(Subcommand)]
pub enum EditSubcommand {
    /// Add a column
    AddColumn {
        /// Column header
        name: String,

        /// Column kind (plain-text, fixed-label, date, numeric, multiline-text)
        #[arg(long, short, default_value = "plain-text")]
        kind: String,

        /// Insert before this column id
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,

        /// Insert after this column id
        #[arg(long)]
        after: Option<String>,
    },

    /// Delete a column and its values
    DeleteColumn {
        /// Column id
        id: String,
    },

    /// Change a column header
    RenameColumn {
        /// Column id
        id: String,

        /// New header
        header: String,
    },

    /// Change a column's kind
    SetKind {
        /// Column id
        id: String,

        /// New kind
        kind: String,
    },

    /// Add an empty row
    AddRow {
        /// Insert after this row id (default: append)
        #[arg(long)]
        after: Option<String>,
    },

    /// Delete a row
    DeleteRow {
        /// Row id
        id: String,
    },

    /// Set one cell
    SetCell {
        /// Row id
        row: String,

        /// Column accessor key
        key: String,

        /// New value, interpreted by the column kind
        value: String,
    },

    /// Set or clear the design photo URL
    SetPhoto {
        /// Photo URL; omit to clear
        url: Option<String>,
    },

    /// Attach a file descriptor
    Attach {
        /// File name
        name: String,

        /// MIME type
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,

        /// Size in bytes
        #[arg(long, default_value_t = 0)]
        size: u64,
    },

    /// Remove attached files by name
    Detach {
        /// File name
        name: String,
    },
}

impl EditCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let mut form = open_form(&self.file, self.layout.as_deref(), config)?;
        let section = form.section_mut(&self.section)?;

        let table = section.table();
        let rows_before: HashSet<RowId> = table.rows.iter().map(|r| r.id.clone()).collect();
        let columns_before: HashSet<String> = table.columns.iter().map(|c| c.id.clone()).collect();

        if !apply(section, &self.action)? {
            println!("No change to section '{}'", self.section);
            return Ok(());
        }

        for row in &section.table().rows {
            if !rows_before.contains(&row.id) {
                println!("Added row {}", row.id);
            }
        }
        for column in &section.table().columns {
            if !columns_before.contains(&column.id) {
                println!("Added column {} ({})", column.id, column.kind);
            }
        }

        form.render();
        store::save_record(&self.file, &form.payload())?;
        println!("Updated section '{}' in {}", self.section, self.file.display());
        Ok(())
    }
}

/// Applies one edit to a mounted section. Returns whether it changed.
fn apply(
    section: &mut SectionSync,
    action: &EditSubcommand,
) -> Result<bool, Box<dyn std::error::Error>> {
    let changed = match action {
        EditSubcommand::AddColumn {
            name,
            kind,
            before,
            after,
        } => {
            let kind: ColumnKind = kind.parse()?;
            if let Some(id) = before.as_ref().or(after.as_ref()) {
                if section.table().column(id).is_none() {
                    return Err(format!("Column not found: {}", id).into());
                }
            }
            let anchor = match (before, after) {
                (Some(id), _) => Some(Anchor::before(id.as_str())),
                (None, Some(id)) => Some(Anchor::after(id.as_str())),
                (None, None) => None,
            };
            section.dispatch(TableAction::AddColumn {
                name: name.clone(),
                kind,
                anchor,
            })
        }

        EditSubcommand::DeleteColumn { id } => {
            let column = section
                .table()
                .column(id)
                .ok_or_else(|| format!("Column not found: {}", id))?;
            if column.is_fixed_label() {
                return Err(
                    format!("Column '{}' is a fixed label and cannot be deleted", id).into(),
                );
            }
            section.dispatch(TableAction::delete_column(id.as_str()))
        }

        EditSubcommand::RenameColumn { id, header } => {
            let target = EditTarget::Header {
                column_id: id.clone(),
            };
            let mut edit = InlineEdit::begin(section.table(), target)
                .ok_or_else(|| format!("Column not found: {}", id))?;
            edit.input(header.as_str());
            section.dispatch(edit.commit())
        }

        EditSubcommand::SetKind { id, kind } => {
            let kind: ColumnKind = kind.parse()?;
            if section.table().column(id).is_none() {
                return Err(format!("Column not found: {}", id).into());
            }
            section.dispatch(TableAction::UpdateColumn {
                column_id: id.clone(),
                change: ColumnChange::Kind(kind),
            })
        }

        EditSubcommand::AddRow { after } => {
            let after = after.as_deref().map(RowId::from);
            if let Some(id) = &after {
                if section.table().row(id).is_none() {
                    return Err(format!("Row not found: {}", id).into());
                }
            }
            section.dispatch(TableAction::add_row(after))
        }

        EditSubcommand::DeleteRow { id } => {
            let id = RowId::from(id.as_str());
            if section.table().row(&id).is_none() {
                return Err(format!("Row not found: {}", id).into());
            }
            section.dispatch(TableAction::delete_row(id))
        }

        EditSubcommand::SetCell { row, key, value } => {
            let target = EditTarget::Cell {
                row_id: RowId::from(row.as_str()),
                accessor_key: key.clone(),
            };
            let mut edit = InlineEdit::begin(section.table(), target)
                .ok_or_else(|| format!("No cell '{}' in row '{}'", key, row))?;
            edit.input(value.as_str());
            section.dispatch(edit.commit())
        }

        EditSubcommand::SetPhoto { url } => {
            if !section.accepts_attachments() {
                return Err(no_attachments(section));
            }
            section.set_design_photo_url(url.clone())
        }

        EditSubcommand::Attach {
            name,
            content_type,
            size,
        } => {
            if !section.accepts_attachments() {
                return Err(no_attachments(section));
            }
            section.attach_file(AttachedFile::new(
                name.as_str(),
                content_type.as_str(),
                *size,
            ))
        }

        EditSubcommand::Detach { name } => section.detach_file(name),
    };
    Ok(changed)
}

fn no_attachments(section: &SectionSync) -> Box<dyn std::error::Error> {
    format!("Section '{}' does not take attachments", section.name()).into()
}
