//! Bounded page-range and section reads.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{SectionRange, Toc};
use crate::options::NavOptions;
use crate::source::{map_pages, DocumentSource};
use crate::toc::{find_section, TocResolver};

/// Text of one page as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageText {
    /// 1-based page number
    pub page: u32,
    /// Trimmed page text; empty for blank or unreadable pages
    pub text: String,
    /// False when text extraction failed
    pub readable: bool,
}

impl PageText {
    /// Characters of text on the page.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Result of [`read_pages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRead {
    /// First page returned, 1-based
    pub start: u32,
    /// Last page returned, 1-based inclusive
    pub end: u32,
    /// Pages in the document
    pub total_pages: u32,
    /// Page texts, in order
    pub pages: Vec<PageText>,
    /// Whether the request was shortened by the page cap
    pub truncated: bool,
}

impl PageRead {
    /// Number of pages returned.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Characters across all returned pages.
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(PageText::char_count).sum()
    }

    /// Pages whose text could not be extracted.
    pub fn unreadable_count(&self) -> usize {
        self.pages.iter().filter(|p| !p.readable).count()
    }
}

/// Result of [`read_section`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRead {
    /// Title of the matched outline entry
    pub title: String,
    /// Pages returned (after capping)
    pub range: SectionRange,
    /// Page texts, in order
    pub pages: Vec<PageText>,
    /// Whether the section was shortened by the page cap
    pub truncated: bool,
    /// The cap that applied
    pub max_pages: u32,
}

impl SectionRead {
    /// Number of pages returned.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Characters across all returned pages.
    pub fn char_count(&self) -> usize {
        self.pages.iter().map(PageText::char_count).sum()
    }

    /// Pages whose text could not be extracted.
    pub fn unreadable_count(&self) -> usize {
        self.pages.iter().filter(|p| !p.readable).count()
    }
}

/// Read `start..=end` (1-based).
///
/// `end` of `None` or `<= 0` reads only `start`. An `end` past the last
/// page is clamped, then the span is capped at `max_pages_per_read`.
pub fn read_pages(
    source: &dyn DocumentSource,
    start: i64,
    end: Option<i64>,
    options: &NavOptions,
) -> Result<PageRead> {
    let total = source.page_count();
    let end = end.filter(|e| *e > 0).unwrap_or(start);

    if start < 1 || start > i64::from(total) {
        return Err(Error::PageOutOfRange { page: start, total });
    }
    if end < start {
        return Err(Error::InvalidArgument(format!(
            "end_page ({}) < start_page ({}).",
            end, start
        )));
    }

    // start is within 1..=total, so these fit in u32
    let start = start as u32;
    let requested_end = end.min(i64::from(total)) as u32;

    let (range, truncated) =
        SectionRange::new(start - 1, requested_end).capped(options.max_pages_per_read);

    log::debug!(
        "reading pages {}-{} of {}{}",
        range.start + 1,
        range.end,
        total,
        if truncated { " (capped)" } else { "" }
    );

    Ok(PageRead {
        start,
        end: range.end,
        total_pages: total,
        pages: read_range(source, range, options.parallel),
        truncated,
    })
}

/// Read the section best matching `query`, resolving the outline first.
pub fn read_section(
    source: &dyn DocumentSource,
    query: &str,
    options: &NavOptions,
) -> Result<SectionRead> {
    let toc = TocResolver::new()
        .with_parallel(options.parallel)
        .resolve(source);
    read_section_in(source, &toc, query, options)
}

/// Read the section best matching `query` in an already-resolved outline.
pub fn read_section_in(
    source: &dyn DocumentSource,
    toc: &Toc,
    query: &str,
    options: &NavOptions,
) -> Result<SectionRead> {
    if toc.is_empty() {
        return Err(Error::NoOutline);
    }

    let found = find_section(toc, query, source.page_count()).ok_or_else(|| {
        Error::SectionNotFound {
            query: query.to_string(),
            suggestions: toc.titles(options.max_suggestions),
        }
    })?;

    let (range, truncated) = found.range.capped(options.max_pages_per_section);
    log::debug!(
        "section {:?} -> pages {}..{}{}",
        found.entry.title,
        range.start + 1,
        range.end,
        if truncated { " (capped)" } else { "" }
    );

    Ok(SectionRead {
        title: found.entry.title,
        range,
        pages: read_range(source, range, options.parallel),
        truncated,
        max_pages: options.max_pages_per_section,
    })
}

/// Extract and trim each page of a range. Unreadable pages are kept, flagged.
fn read_range(source: &dyn DocumentSource, range: SectionRange, parallel: bool) -> Vec<PageText> {
    map_pages(range.start..range.end, parallel, |i| match source.raw_text(i) {
        Ok(text) => PageText {
            page: i + 1,
            text: text.trim().to_string(),
            readable: true,
        },
        Err(e) => {
            log::warn!("page {}: {}", i + 1, e);
            PageText {
                page: i + 1,
                text: String::new(),
                readable: false,
            }
        }
    })
}
