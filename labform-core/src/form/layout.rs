//! Form layouts: which sections a record has and their default tables.
//!
//! Layouts are data. A layout file lists one or more template variants
//! (e.g. one per welding code); each variant is an ordered list of sections.
//!
//! ```yaml
//! name: pqr
//! default_variant: asme
//! variants:
//!   asme:
//!     - name: joints
//!       title: Joints (QW-402)
//!       attachments: true
//!       columns:
//!         - { id: label, header: Parameter, accessorKey: label, type: fixed-label }
//!         - { id: value, header: Value, accessorKey: value }
//!       rows:
//!         - { id: r1, label: Joint Design, value: "" }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{Column, Row, SectionEntry, SectionName, TableState};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read layout file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse layout: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Layout '{0}' has no variants")]
    NoVariants(String),

    #[error("Variant '{0}' has no sections")]
    EmptyVariant(String),

    #[error("Variant '{variant}' lists section '{section}' more than once")]
    DuplicateSection { variant: String, section: String },

    #[error("Section '{section}' defines column '{column}' more than once")]
    DuplicateColumn { section: String, column: String },

    #[error("Section '{section}' column '{column}' uses the reserved accessor key 'id'")]
    ReservedKey { section: String, column: String },

    #[error("Default variant '{0}' is not defined")]
    UnknownDefault(String),
}

/// Default content of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionTemplate {
    pub name: SectionName,
    #[serde(default)]
    pub title: String,
    /// Whether the section carries a design photo and attached files.
    #[serde(default)]
    pub attachments: bool,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl SectionTemplate {
    pub fn entry(&self) -> SectionEntry {
        SectionEntry::from(TableState::new(self.columns.clone(), self.rows.clone()))
    }

    /// Title for display, falling back to the section name.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            self.name.as_str()
        } else {
            &self.title
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormLayout {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_variant: Option<String>,
    pub variants: BTreeMap<String, Vec<SectionTemplate>>,
}

impl FormLayout {
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, LayoutError> {
        let layout: FormLayout = serde_yaml::from_str(contents)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.variants.is_empty() {
            return Err(LayoutError::NoVariants(self.name.clone()));
        }
        if let Some(default) = &self.default_variant {
            if !self.variants.contains_key(default) {
                return Err(LayoutError::UnknownDefault(default.clone()));
            }
        }

        for (variant, sections) in &self.variants {
            if sections.is_empty() {
                return Err(LayoutError::EmptyVariant(variant.clone()));
            }
            let mut names = HashSet::new();
            for section in sections {
                if !names.insert(&section.name) {
                    return Err(LayoutError::DuplicateSection {
                        variant: variant.clone(),
                        section: section.name.to_string(),
                    });
                }
                let mut ids = HashSet::new();
                for column in &section.columns {
                    if !ids.insert(column.id.as_str()) {
                        return Err(LayoutError::DuplicateColumn {
                            section: section.name.to_string(),
                            column: column.id.clone(),
                        });
                    }
                    // Rows serialize their own id under this key.
                    if column.accessor_key == "id" {
                        return Err(LayoutError::ReservedKey {
                            section: section.name.to_string(),
                            column: column.id.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    /// The explicit default, else the first variant in name order.
    pub fn default_variant(&self) -> &str {
        match &self.default_variant {
            Some(name) => name,
            None => self
                .variants
                .keys()
                .next()
                .map(String::as_str)
                .unwrap_or_default(),
        }
    }

    pub fn sections(&self, variant: &str) -> Option<&[SectionTemplate]> {
        self.variants.get(variant).map(Vec::as_slice)
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }
}
