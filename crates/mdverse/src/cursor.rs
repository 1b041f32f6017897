//! Position tracking for stepping through a result set.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::filter::FilterSpec;
use crate::store::TableKind;

/// Current row within a result set of known size.
///
/// `position < size` whenever `size > 0`; `position == 0` when empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionCursor {
    position: usize,
    size: usize,
}

impl SelectionCursor {
    /// Cursor at the start of an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cursor at the start of a set of `size` rows.
    pub fn with_size(size: usize) -> Self {
        Self { position: 0, size }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Back to the first row.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Adopt a new set size, pulling the position back inside it.
    pub fn clamp(&mut self, size: usize) {
        self.size = size;
        self.position = self.position.min(size.saturating_sub(1));
    }

    pub fn can_next(&self) -> bool {
        self.position + 1 < self.size
    }

    pub fn can_previous(&self) -> bool {
        self.position > 0
    }

    /// Step forward; no-op on the last row.
    pub fn next(&mut self) {
        if self.can_next() {
            self.position += 1;
        }
    }

    /// Step back; no-op on the first row.
    pub fn previous(&mut self) {
        if self.can_previous() {
            self.position -= 1;
        }
    }

    pub fn jump_first(&mut self) {
        self.position = 0;
    }

    pub fn jump_last(&mut self) {
        self.position = self.size.saturating_sub(1);
    }

    /// Jump to a position; ignored when out of range.
    pub fn select(&mut self, position: usize) {
        if position < self.size {
            self.position = position;
        }
    }
}

impl fmt::Display for SelectionCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size == 0 {
            write!(f, "0 / 0")
        } else {
            write!(f, "{} / {}", self.position + 1, self.size)
        }
    }
}

/// What makes two searches "the same search".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIdentity {
    pub table: TableKind,
    pub keyword: String,
    pub show_all: bool,
    /// Filters that actually narrow the result, in request order, keyed by
    /// underlying column name and carrying the typed constraint.
    pub filters: Vec<FilterSpec>,
}

impl QueryIdentity {
    /// Identity with the keyword trimmed the way search trims it.
    pub fn new(table: TableKind, keyword: &str, show_all: bool, filters: Vec<FilterSpec>) -> Self {
        Self {
            table,
            keyword: keyword.trim().to_string(),
            show_all,
            filters,
        }
    }

    /// Stable hex digest of the identity.
    pub fn fingerprint(&self) -> String {
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        format!("{:x}", hasher.finalize())
    }
}

/// Cursor plus the identity of the query it belongs to.
///
/// Owned by the caller and passed along with each search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseSession {
    identity: Option<QueryIdentity>,
    cursor: SelectionCursor,
}

impl BrowseSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new search result.
    ///
    /// The cursor resets when the identity differs from the previous one and
    /// is then clamped to `size`.
    pub fn observe(&mut self, identity: QueryIdentity, size: usize) {
        if self.identity.as_ref() != Some(&identity) {
            self.cursor.reset();
            self.identity = Some(identity);
        }
        self.cursor.clamp(size);
    }

    pub fn identity(&self) -> Option<&QueryIdentity> {
        self.identity.as_ref()
    }

    pub fn cursor(&self) -> &SelectionCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut SelectionCursor {
        &mut self.cursor
    }
}
