//! Outline (table of contents) types.

use serde::{Deserialize, Serialize};

/// A single outline entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Nesting level (1 = top level)
    pub level: u32,

    /// Trimmed, non-empty title
    pub title: String,

    /// Target page number (1-indexed)
    pub page: u32,
}

impl OutlineEntry {
    /// Create a new outline entry.
    pub fn new(level: u32, title: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            title: title.into(),
            page,
        }
    }
}

/// Where a [`Toc`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TocSource {
    /// The document's embedded outline
    Native,
    /// Inferred from typography
    Detected,
}

/// The canonical outline of a document, in document order.
///
/// An empty `Toc` means no structure is available; it is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toc {
    /// Entries in document order
    pub entries: Vec<OutlineEntry>,

    /// Origin of the entries
    pub source: TocSource,
}

impl Toc {
    /// Create a Toc from entries.
    pub fn new(entries: Vec<OutlineEntry>, source: TocSource) -> Self {
        Self { entries, source }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the Toc has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries.
    pub fn iter(&self) -> std::slice::Iter<'_, OutlineEntry> {
        self.entries.iter()
    }

    /// Get an entry by position.
    pub fn get(&self, index: usize) -> Option<&OutlineEntry> {
        self.entries.get(index)
    }

    /// Titles of the first `limit` entries.
    pub fn titles(&self, limit: usize) -> Vec<String> {
        self.entries
            .iter()
            .take(limit)
            .map(|e| e.title.clone())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Toc {
    type Item = &'a OutlineEntry;
    type IntoIter = std::slice::Iter<'a, OutlineEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A half-open range of 0-based page indices.
///
/// `end == start` is an empty section (its heading shares a page with the
/// next boundary heading).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRange {
    /// First page, 0-based
    pub start: u32,
    /// One past the last page, 0-based
    pub end: u32,
}

impl SectionRange {
    /// Create a range; an inverted range collapses to empty.
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the range covers no pages.
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Shorten the range to at most `max_pages` pages.
    ///
    /// Returns the clamped range and whether clamping happened.
    pub fn capped(self, max_pages: u32) -> (Self, bool) {
        if self.page_count() > max_pages {
            (Self::new(self.start, self.start + max_pages), true)
        } else {
            (self, false)
        }
    }
}
