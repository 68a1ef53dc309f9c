//! Change-detection fingerprints.
//!
//! A fingerprint is a SHA-256 digest over a canonical, length-prefixed
//! encoding of a value. Two values have the same fingerprint exactly when
//! they would serialize to the same record payload.

use sha2::{Digest, Sha256};
use std::fmt;

use crate::models::{CellValue, Column, Row, SectionEntry, TableState};

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex()[..12])
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self)
    }
}

/// Values the section synchronizer can compare.
pub trait Snapshot {
    fn fingerprint(&self) -> Fingerprint;
}

struct Encoder(Sha256);

impl Encoder {
    fn new(domain: &str) -> Self {
        let mut encoder = Self(Sha256::new());
        encoder.str(domain);
        encoder
    }

    fn tag(&mut self, tag: u8) {
        self.0.update([tag]);
    }

    fn len(&mut self, len: usize) {
        self.0.update((len as u64).to_le_bytes());
    }

    fn str(&mut self, s: &str) {
        self.len(s.len());
        self.0.update(s.as_bytes());
    }

    fn opt_str(&mut self, s: Option<&str>) {
        match s {
            None => self.tag(0),
            Some(s) => {
                self.tag(1);
                self.str(s);
            }
        }
    }

    fn column(&mut self, column: &Column) {
        self.str(&column.id);
        self.str(&column.header);
        self.str(&column.accessor_key);
        self.str(column.kind.as_str());
        self.opt_str(column.placeholder.as_deref());
    }

    fn value(&mut self, value: &CellValue) {
        // Same tags as the JSON form: "" and Empty are one value.
        match value {
            CellValue::Empty => {
                self.tag(b's');
                self.str("");
            }
            CellValue::Text(s) => {
                self.tag(b's');
                self.str(s);
            }
            CellValue::Number(n) => {
                self.tag(b'n');
                self.0.update(n.to_bits().to_le_bytes());
            }
            CellValue::Bool(b) => {
                self.tag(b'b');
                self.tag(u8::from(*b));
            }
            CellValue::Date(d) => {
                self.tag(b's');
                self.str(&d.format("%Y-%m-%d").to_string());
            }
        }
    }

    fn row(&mut self, row: &Row) {
        self.str(row.id.as_str());
        self.len(row.cells.len());
        for (key, value) in &row.cells {
            self.str(key);
            self.value(value);
        }
    }

    fn table(&mut self, columns: &[Column], rows: &[Row]) {
        self.len(columns.len());
        for column in columns {
            self.column(column);
        }
        self.len(rows.len());
        for row in rows {
            self.row(row);
        }
    }

    fn finish(self) -> Fingerprint {
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&self.0.finalize());
        Fingerprint(bytes)
    }
}

impl Snapshot for TableState {
    fn fingerprint(&self) -> Fingerprint {
        let mut encoder = Encoder::new("table");
        encoder.table(&self.columns, &self.rows);
        encoder.finish()
    }
}

impl Snapshot for SectionEntry {
    fn fingerprint(&self) -> Fingerprint {
        let mut encoder = Encoder::new("section");
        encoder.table(&self.columns, &self.rows);
        encoder.opt_str(self.design_photo_url.as_deref());
        encoder.len(self.files.len());
        for file in &self.files {
            encoder.str(&file.name);
            encoder.str(&file.content_type);
            encoder.0.update(file.size.to_le_bytes());
        }
        encoder.finish()
    }
}
