mod column;
mod row;
mod section;
mod table;
mod value;

pub use column::{Column, ColumnKind, Editor};
pub use row::{Row, RowId};
pub use section::{AttachedFile, SectionEntry, SectionName};
pub use table::TableState;
pub use value::CellValue;
