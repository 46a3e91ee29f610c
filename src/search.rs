//! Case-insensitive full-text search.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::SearchHit;
use crate::options::NavOptions;
use crate::source::{map_pages, DocumentSource};

/// Hits on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageHits {
    /// 1-based page number
    pub page: u32,
    /// Matches on the page
    pub count: usize,
}

/// Result of [`search`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    /// The query as given
    pub query: String,
    /// Matches across the whole document, including those past the cap
    pub total_hits: usize,
    /// Pages with at least one match, ascending
    pub pages: Vec<PageHits>,
    /// Materialized snippets, in document order
    pub hits: Vec<SearchHit>,
    /// Snippet cap that applied
    pub max_results: usize,
    /// Pages skipped because their text could not be extracted
    pub unreadable_pages: usize,
}

impl SearchResults {
    /// Check if nothing matched.
    pub fn is_empty(&self) -> bool {
        self.total_hits == 0
    }

    /// Whether some matches have no snippet.
    pub fn is_capped(&self) -> bool {
        self.total_hits > self.max_results
    }
}

/// Text of one page, folded for case-insensitive comparison.
///
/// Folding is per character so `folded[i]` always corresponds to
/// `original[i]`.
struct FoldedPage {
    original: Vec<char>,
    folded: Vec<char>,
}

impl FoldedPage {
    fn new(text: &str) -> Self {
        let original: Vec<char> = text.chars().collect();
        let folded = original.iter().map(|&c| fold_char(c)).collect();
        Self { original, folded }
    }

    /// Start of every occurrence, advancing one character past each start.
    fn find_all(&self, needle: &[char]) -> Vec<usize> {
        if needle.is_empty() || needle.len() > self.folded.len() {
            return Vec::new();
        }
        self.folded
            .windows(needle.len())
            .enumerate()
            .filter(|(_, window)| *window == needle)
            .map(|(pos, _)| pos)
            .collect()
    }

    fn snippet(&self, page: u32, pos: usize, len: usize, context: usize) -> SearchHit {
        let start = pos.saturating_sub(context);
        let end = (pos + len + context).min(self.original.len());
        let raw: String = self.original[start..end].iter().collect();
        SearchHit {
            page,
            snippet: raw.replace('\n', " ").trim().to_string(),
            truncated_left: start > 0,
            truncated_right: end < self.original.len(),
        }
    }
}

fn fold_char(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Search every page for `query`, case-insensitively.
///
/// Every match is counted; snippets are materialized for the first
/// `max_results` in document order.
pub fn search(
    source: &dyn DocumentSource,
    query: &str,
    max_results: usize,
    options: &NavOptions,
) -> Result<SearchResults> {
    if query.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "Search query cannot be empty.".to_string(),
        ));
    }

    let needle: Vec<char> = query.chars().map(fold_char).collect();

    // Pages keep only their match count and at most `max_results` snippets
    let scanned = map_pages(0..source.page_count(), options.parallel, |i| {
        let text = source.raw_text(i).map_err(|e| {
            log::warn!("search skipping page {}: {}", i + 1, e);
            e
        })?;
        let page = FoldedPage::new(&text);
        let positions = page.find_all(&needle);
        if positions.is_empty() {
            return Ok(None);
        }
        let snippets: Vec<SearchHit> = positions
            .iter()
            .take(max_results)
            .map(|&pos| page.snippet(i + 1, pos, needle.len(), options.snippet_context))
            .collect();
        Ok::<_, Error>(Some((positions.len(), snippets)))
    });

    let mut results = SearchResults {
        query: query.to_string(),
        total_hits: 0,
        pages: Vec::new(),
        hits: Vec::new(),
        max_results,
        unreadable_pages: 0,
    };

    for (i, scan) in scanned.into_iter().enumerate() {
        let (count, snippets) = match scan {
            Ok(Some(scan)) => scan,
            Ok(None) => continue,
            Err(_) => {
                results.unreadable_pages += 1;
                continue;
            }
        };

        results.total_hits += count;
        results.pages.push(PageHits {
            page: i as u32 + 1,
            count,
        });

        let room = max_results.saturating_sub(results.hits.len());
        results.hits.extend(snippets.into_iter().take(room));
    }

    log::debug!(
        "search {:?}: {} hit(s) on {} page(s)",
        query,
        results.total_hits,
        results.pages.len()
    );
    Ok(results)
}
