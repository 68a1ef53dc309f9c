//! Identifier generation for runtime-created rows and columns.
//!
//! A timestamp alone collides when two additions land in the same
//! millisecond, so every token carries a per-source monotonic counter.

use uuid::Uuid;

use crate::models::RowId;

/// Source of unique tokens for new row ids and column accessor keys.
pub trait IdSource {
    /// Returns a token never returned before by this source.
    fn next_token(&mut self) -> String;

    fn row_id(&mut self) -> RowId {
        RowId::new(format!("row_{}", self.next_token()))
    }

    /// Accessor key (and id) for a column created from a display name.
    fn column_key(&mut self, name: &str) -> String {
        format!("{}_{}", slugify(name), self.next_token())
    }
}

/// Lower-cases a display name and collapses whitespace runs into `_`.
pub fn slugify(name: &str) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if slug.is_empty() {
        "column".to_string()
    } else {
        slug
    }
}

/// Default source: a random UUID fragment plus a monotonic counter.
#[derive(Debug, Default)]
pub struct UniqueIds {
    counter: u64,
}

impl UniqueIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for UniqueIds {
    fn next_token(&mut self) -> String {
        self.counter += 1;
        let uuid = Uuid::new_v4().simple().to_string();
        format!("{}{:x}", &uuid[..8], self.counter)
    }
}

/// Deterministic `1, 2, 3, ...` tokens, for scripted edits and tests.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIds {
    fn next_token(&mut self) -> String {
        let token = self.next.to_string();
        self.next += 1;
        token
    }
}
