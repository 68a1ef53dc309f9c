//! Labform Core Library
//!
//! Schema-driven section tables for lab test records: the table engine,
//! the section synchronizer and the multi-section form built on them.

pub mod client;
pub mod edit;
pub mod engine;
pub mod fingerprint;
pub mod form;
pub mod ids;
pub mod models;
pub mod sync;
pub mod view;

pub use client::{HttpRecordClient, Receipt, SubmitError, Submitter};
pub use edit::{EditEvent, EditKey, EditTarget, InlineEdit};
pub use engine::{Anchor, ColumnChange, Rejection, Side, TableAction, TableEngine, Transition};
pub use fingerprint::{Fingerprint, Snapshot};
pub use form::{
    Aggregate, FormError, FormLayout, LayoutError, MultiSectionForm, Record, SectionTemplate,
    SectionUpdater,
};
pub use ids::{IdSource, SequentialIds, UniqueIds};
pub use models::{
    AttachedFile, CellValue, Column, ColumnKind, Editor, Row, RowId, SectionEntry, SectionName,
    TableState,
};
pub use sync::{RenderOutcome, SectionSync};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
