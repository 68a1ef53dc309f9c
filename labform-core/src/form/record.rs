use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{SectionEntry, SectionName};

/// Sections of a record keyed by section name.
pub type Aggregate = BTreeMap<SectionName, SectionEntry>;

/// A complete record as exchanged with the backend: the outbound payload on
/// submit, and the saved record loaded for editing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub form_name: String,
    pub variant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepared_by: Option<String>,
    #[serde(default)]
    pub sections: Aggregate,
}

impl Record {
    pub fn new(form_name: impl Into<String>, variant: impl Into<String>) -> Self {
        Self {
            id: None,
            form_name: form_name.into(),
            variant: variant.into(),
            prepared_by: None,
            sections: Aggregate::new(),
        }
    }

    /// At least one section holds data.
    pub fn has_data(&self) -> bool {
        self.sections.values().any(SectionEntry::has_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, ColumnKind, Row, TableState};

    #[test]
    fn test_record_json_shape() {
        let mut record = Record::new("pqr", "asme");
        record.prepared_by = Some("j.doe".into());
        record.sections.insert(
            "joints".into(),
            SectionEntry::from(TableState::new(
                vec![Column::new("value", "Value", ColumnKind::PlainText)],
                vec![Row::new("r1").with_cell("value", "V-groove")],
            )),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["formName"], "pqr");
        assert_eq!(json["preparedBy"], "j.doe");
        assert!(json.get("id").is_none());
        assert_eq!(json["sections"]["joints"]["rows"][0]["value"], "V-groove");

        let parsed: Record = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, record);
        assert!(parsed.has_data());
    }

    #[test]
    fn test_empty_record_has_no_data() {
        let record: Record =
            serde_json::from_str(r#"{"formName":"pqr","variant":"asme"}"#).unwrap();
        assert!(record.sections.is_empty());
        assert!(!record.has_data());
    }
}
