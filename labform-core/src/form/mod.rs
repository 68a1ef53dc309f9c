//! Multi-section record forms.
//!
//! A [`MultiSectionForm`] mounts one [`SectionSync`](crate::sync::SectionSync)
//! per section of the chosen layout variant and keeps their values in a
//! single shared aggregate, which becomes the submitted [`Record`].

mod aggregate;
mod layout;
mod record;

pub use aggregate::{MultiSectionForm, SectionUpdater};
pub use layout::{FormLayout, LayoutError, SectionTemplate};
pub use record::{Aggregate, Record};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown template variant '{0}'")]
    UnknownVariant(String),

    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
pub(crate) mod fixtures {
    pub(crate) const PQR_LAYOUT: &str = r#"
name: pqr
default_variant: asme
variants:
  asme:
    - name: joints
      title: Joints (QW-402)
      attachments: true
      columns:
        - { id: label, header: Parameter, accessorKey: label, type: label }
        - { id: value, header: Value, accessorKey: value, type: input }
      rows:
        - { id: r1, label: Joint Design, value: "" }
        - { id: r2, label: Backing, value: "" }
    - name: filler_metals
      title: Filler Metals (QW-404)
      columns:
        - { id: label, header: Parameter, accessorKey: label, type: fixed-label }
        - { id: value, header: Value, accessorKey: value }
      rows:
        - { id: r1, label: SFA Specification, value: "" }
  aws:
    - name: joints
      columns:
        - { id: label, header: Item, accessorKey: label, type: fixed-label }
        - { id: detail, header: Detail, accessorKey: detail }
      rows:
        - { id: r1, label: Groove Type, detail: "" }
"#;
}
