//! Outline resolution.
//!
//! [`get_toc`] prefers the document's embedded outline and falls back to
//! [`HeadingDetector`]. [`find_section`] maps a free-text section request to
//! a page range by fuzzy matching against outline titles.

mod heading;
mod layout;

pub use heading::{median, HeadingDetector, HeadingRule, LineFeatures, Verdict};
pub use layout::{group_into_lines, is_spaceless_script_char, TextLine};

use std::collections::HashSet;

use crate::model::{OutlineEntry, SectionRange, Toc, TocSource};
use crate::source::{map_pages, DocumentSource};

/// Produces the canonical outline of a document.
#[derive(Debug, Default)]
pub struct TocResolver {
    detector: HeadingDetector,
    parallel: bool,
}

impl TocResolver {
    /// Resolver with the standard heading rules, scanning pages serially.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom heading detector.
    pub fn with_detector(mut self, detector: HeadingDetector) -> Self {
        self.detector = detector;
        self
    }

    /// Enable or disable parallel span extraction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Native outline entries with non-empty titles, or detected headings
    /// when there are none. Empty when neither yields anything.
    pub fn resolve(&self, source: &dyn DocumentSource) -> Toc {
        let native: Vec<OutlineEntry> = match source.native_outline() {
            Ok(entries) => entries
                .into_iter()
                .filter_map(|e| {
                    let title = e.title.trim();
                    (!title.is_empty()).then(|| OutlineEntry::new(e.level, title, e.page))
                })
                .collect(),
            Err(e) => {
                log::warn!("failed to read embedded outline: {}", e);
                Vec::new()
            }
        };

        if !native.is_empty() {
            log::debug!("using embedded outline ({} entries)", native.len());
            return Toc::new(native, TocSource::Native);
        }

        let spans_by_page = map_pages(0..source.page_count(), self.parallel, |i| {
            source.text_spans(i).unwrap_or_else(|e| {
                log::warn!("skipping page {} for heading detection: {}", i + 1, e);
                Vec::new()
            })
        });

        let detected = self.detector.detect(spans_by_page);
        log::debug!("no embedded outline; detected {} headings", detected.len());
        Toc::new(detected, TocSource::Detected)
    }
}

/// Outline of a document using the standard resolver.
pub fn get_toc(source: &dyn DocumentSource) -> Toc {
    TocResolver::new().resolve(source)
}

/// A resolved section request.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionMatch {
    /// Position of the matched entry in the Toc
    pub index: usize,
    /// The matched entry
    pub entry: OutlineEntry,
    /// Pages covered by the section
    pub range: SectionRange,
}

/// How well a title answers a query.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Score {
    /// Stop scanning: this entry wins
    Exact,
    /// Candidate; higher is better
    Partial(f64),
}

/// Normalized form of a query or title.
struct Normalized {
    lower: String,
    compact: String,
}

impl Normalized {
    fn new(text: &str) -> Self {
        let lower = text.trim().to_lowercase();
        let compact = lower.chars().filter(|c| !c.is_whitespace()).collect();
        Self { lower, compact }
    }

    fn char_len(&self) -> usize {
        self.lower.chars().count()
    }

    fn words(&self) -> HashSet<&str> {
        self.lower.split_whitespace().collect()
    }
}

fn exact_score(query: &Normalized, title: &Normalized) -> Option<Score> {
    (query.lower == title.lower || query.compact == title.compact).then_some(Score::Exact)
}

fn substring_score(query: &Normalized, title: &Normalized) -> Option<Score> {
    let contains = title.lower.contains(&query.lower) || query.lower.contains(&title.lower);
    contains.then(|| Score::Partial(query.char_len() as f64 / title.char_len().max(1) as f64))
}

fn word_overlap_score(query: &Normalized, title: &Normalized) -> Option<Score> {
    let query_words = query.words();
    let title_words = title.words();
    let overlap = query_words.intersection(&title_words).count();
    if overlap == 0 {
        return None;
    }
    let union = query_words.union(&title_words).count();
    Some(Score::Partial(overlap as f64 / union.max(1) as f64))
}

/// First tier with an opinion scores the entry; lower tiers are not consulted.
fn score(query: &Normalized, title: &Normalized) -> Option<Score> {
    exact_score(query, title)
        .or_else(|| substring_score(query, title))
        .or_else(|| word_overlap_score(query, title))
}

/// Resolve a section query to a page range.
///
/// An exact title match (case-insensitive, or ignoring whitespace) wins
/// immediately; otherwise the best substring or word-overlap score wins,
/// earlier entries keeping ties. The range runs from the matched entry's
/// page to the page before the next entry at the same or a higher level,
/// or to the end of the document.
pub fn find_section(toc: &Toc, query: &str, total_pages: u32) -> Option<SectionMatch> {
    let query = Normalized::new(query);

    let mut best: Option<(usize, f64)> = None;
    for (i, entry) in toc.iter().enumerate() {
        match score(&query, &Normalized::new(&entry.title)) {
            Some(Score::Exact) => {
                best = Some((i, f64::INFINITY));
                break;
            }
            Some(Score::Partial(s)) if s > best.map_or(0.0, |(_, b)| b) => best = Some((i, s)),
            _ => {}
        }
    }

    let (index, _) = best?;
    let entry = toc.get(index)?.clone();

    let start = entry.page.saturating_sub(1).min(total_pages);
    let end = toc
        .iter()
        .skip(index + 1)
        .find(|next| next.level <= entry.level)
        .map(|next| next.page.saturating_sub(1).min(total_pages))
        .unwrap_or(total_pages);

    Some(SectionMatch {
        index,
        entry,
        range: SectionRange::new(start, end),
    })
}
