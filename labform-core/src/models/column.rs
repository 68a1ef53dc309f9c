use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::value::CellValue;

/// Editing control and value coercion of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColumnKind {
    #[default]
    #[serde(alias = "input")]
    PlainText,
    #[serde(alias = "label")]
    FixedLabel,
    Date,
    Numeric,
    #[serde(alias = "textarea")]
    MultilineText,
}

/// The control a UI shows for a column kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Editor {
    SingleLine,
    StaticLabel,
    DatePicker,
    NumberInput,
    TextArea,
}

impl ColumnKind {
    pub const ALL: [ColumnKind; 5] = [
        ColumnKind::PlainText,
        ColumnKind::FixedLabel,
        ColumnKind::Date,
        ColumnKind::Numeric,
        ColumnKind::MultilineText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::PlainText => "plain-text",
            ColumnKind::FixedLabel => "fixed-label",
            ColumnKind::Date => "date",
            ColumnKind::Numeric => "numeric",
            ColumnKind::MultilineText => "multiline-text",
        }
    }

    pub fn editor(&self) -> Editor {
        match self {
            ColumnKind::PlainText => Editor::SingleLine,
            ColumnKind::FixedLabel => Editor::StaticLabel,
            ColumnKind::Date => Editor::DatePicker,
            ColumnKind::Numeric => Editor::NumberInput,
            ColumnKind::MultilineText => Editor::TextArea,
        }
    }

    /// Whether Enter inserts a newline instead of committing.
    pub fn is_multiline(&self) -> bool {
        matches!(self, ColumnKind::MultilineText)
    }

    /// Converts committed editor text into a cell value. Never fails: input
    /// that does not fit the kind is kept as text.
    pub fn coerce(&self, raw: &str) -> CellValue {
        match self {
            ColumnKind::MultilineText => CellValue::text(raw),
            ColumnKind::PlainText | ColumnKind::FixedLabel => CellValue::text(raw.trim_end()),
            ColumnKind::Date => {
                let trimmed = raw.trim();
                match chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
                    Ok(date) => CellValue::Date(date),
                    Err(_) => CellValue::text(trimmed),
                }
            }
            ColumnKind::Numeric => {
                let trimmed = raw.trim();
                match trimmed.parse::<f64>() {
                    Ok(n) if n.is_finite() => CellValue::Number(n),
                    _ => CellValue::text(trimmed),
                }
            }
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain-text" | "input" => Ok(ColumnKind::PlainText),
            "fixed-label" | "label" => Ok(ColumnKind::FixedLabel),
            "date" => Ok(ColumnKind::Date),
            "numeric" => Ok(ColumnKind::Numeric),
            "multiline-text" | "textarea" => Ok(ColumnKind::MultilineText),
            _ => Err(format!(
                "Invalid column kind '{}'. Valid options: plain-text, fixed-label, date, numeric, multiline-text",
                s
            )),
        }
    }
}

/// One field definition of a section table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    pub header: String,
    pub accessor_key: String,
    #[serde(rename = "type", default)]
    pub kind: ColumnKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Column {
    /// A column whose accessor key equals its id.
    pub fn new(id: impl Into<String>, header: impl Into<String>, kind: ColumnKind) -> Self {
        let id = id.into();
        Self {
            accessor_key: id.clone(),
            id,
            header: header.into(),
            kind,
            placeholder: None,
        }
    }

    pub fn with_accessor_key(mut self, key: impl Into<String>) -> Self {
        self.accessor_key = key.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn is_fixed_label(&self) -> bool {
        self.kind == ColumnKind::FixedLabel
    }
}
