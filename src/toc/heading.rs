//! Typography-based heading detection.
//!
//! Lines are classified by an ordered chain of [`HeadingRule`]s. Each rule
//! either has no opinion or returns a [`Verdict`]; the first opinion wins.

use regex::Regex;

use super::layout::{group_into_lines, TextLine};
use crate::model::{OutlineEntry, Span};

/// Ratio of the median size at or above which a line is a heading.
pub const HEADING_RATIO: f32 = 1.25;
/// Ratio of the median size at or above which a heading is level 1.
pub const TOP_LEVEL_RATIO: f32 = 1.5;
/// Shortest heading, in characters.
pub const MIN_TITLE_CHARS: usize = 2;
/// Longest heading, in characters.
pub const MAX_TITLE_CHARS: usize = 120;

/// Outcome of a rule that has an opinion about a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The line is a heading at this level
    Heading(u32),
    /// The line is definitely not a heading
    NotHeading,
}

/// What a rule sees about one line.
#[derive(Debug, Clone, Copy)]
pub struct LineFeatures<'a> {
    /// Trimmed line text
    pub text: &'a str,
    /// Largest span size on the line
    pub size: f32,
    /// Whether any span on the line is bold
    pub bold: bool,
    /// Document median span size
    pub median: f32,
}

/// One classification rule.
pub trait HeadingRule: Send + Sync {
    /// Rule name, for logging.
    fn name(&self) -> &'static str;

    /// Classify a line, or `None` for no opinion.
    fn classify(&self, line: &LineFeatures<'_>) -> Option<Verdict>;
}

/// Rejects lines too short or too long to be titles.
struct LengthRule;

impl HeadingRule for LengthRule {
    fn name(&self) -> &'static str {
        "length"
    }

    fn classify(&self, line: &LineFeatures<'_>) -> Option<Verdict> {
        let chars = line.text.chars().count();
        (!(MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&chars)).then_some(Verdict::NotHeading)
    }
}

/// Promotes lines noticeably larger than body text.
struct SizeRule;

impl HeadingRule for SizeRule {
    fn name(&self) -> &'static str {
        "size"
    }

    fn classify(&self, line: &LineFeatures<'_>) -> Option<Verdict> {
        if line.size >= line.median * TOP_LEVEL_RATIO {
            Some(Verdict::Heading(1))
        } else if line.size >= line.median * HEADING_RATIO {
            Some(Verdict::Heading(2))
        } else {
            None
        }
    }
}

/// Promotes bold body-size lines that are numbered or all caps.
struct BoldPatternRule {
    numbered: Regex,
    uppercase: Regex,
}

impl HeadingRule for BoldPatternRule {
    fn name(&self) -> &'static str {
        "bold-pattern"
    }

    fn classify(&self, line: &LineFeatures<'_>) -> Option<Verdict> {
        let matches = line.bold
            && line.size >= line.median
            && (self.numbered.is_match(line.text) || self.uppercase.is_match(line.text));
        matches.then_some(Verdict::Heading(1))
    }
}

/// Promotes numbered body-size lines regardless of weight.
struct NumberedRule {
    numbered: Regex,
}

impl HeadingRule for NumberedRule {
    fn name(&self) -> &'static str {
        "numbered"
    }

    fn classify(&self, line: &LineFeatures<'_>) -> Option<Verdict> {
        (line.size >= line.median && self.numbered.is_match(line.text))
            .then_some(Verdict::Heading(1))
    }
}

/// Infers an outline from font sizes, weight and numbering.
pub struct HeadingDetector {
    rules: Vec<Box<dyn HeadingRule>>,
}

impl Default for HeadingDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HeadingDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

impl HeadingDetector {
    /// Detector with the standard rule chain:
    /// length filter, size threshold, bold + pattern, pattern only.
    pub fn new() -> Self {
        let numbered = numbered_pattern();
        Self {
            rules: vec![
                Box::new(LengthRule),
                Box::new(SizeRule),
                Box::new(BoldPatternRule {
                    numbered: numbered.clone(),
                    uppercase: uppercase_pattern(),
                }),
                Box::new(NumberedRule { numbered }),
            ],
        }
    }

    /// Detector with a custom rule chain, evaluated in order.
    pub fn with_rules(rules: Vec<Box<dyn HeadingRule>>) -> Self {
        Self { rules }
    }

    /// Classify one line; `None` when no rule has an opinion.
    pub fn classify(&self, line: &LineFeatures<'_>) -> Option<Verdict> {
        self.rules.iter().find_map(|rule| {
            let verdict = rule.classify(line)?;
            log::trace!("rule {} -> {:?} for {:?}", rule.name(), verdict, line.text);
            Some(verdict)
        })
    }

    /// Detect headings across a document, given each page's spans in page
    /// order. Returns entries in page-then-visual order.
    pub fn detect(&self, spans_by_page: Vec<Vec<Span>>) -> Vec<OutlineEntry> {
        let mut sizes: Vec<f32> = spans_by_page
            .iter()
            .flatten()
            .map(|s| s.font_size)
            .collect();
        let Some(median) = median(&mut sizes) else {
            return Vec::new();
        };

        let lines: Vec<TextLine> = spans_by_page
            .into_iter()
            .flat_map(group_into_lines)
            .collect();

        let mut entries = Vec::new();
        for line in &lines {
            let text = line.text();
            let features = LineFeatures {
                text: text.trim(),
                size: line.font_size,
                bold: line.bold,
                median,
            };
            if let Some(Verdict::Heading(level)) = self.classify(&features) {
                entries.push(OutlineEntry::new(level, features.text, line.page_index + 1));
            }
        }

        log::debug!(
            "detected {} headings from {} lines (median size {:.1})",
            entries.len(),
            lines.len(),
            median
        );
        entries
    }
}

/// Median of a population; the mean of the two middle values for even counts.
pub fn median(values: &mut [f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// "1.", "2.3", "4.1.2" or "A.1" followed by whitespace and a capital letter.
fn numbered_pattern() -> Regex {
    Regex::new(r"^(\d+(\.\d+)*\.?|[A-Z](\.\d+)+\.?)\s+[A-Z]").expect("valid regex")
}

/// At least five characters of capitals, spaces, colons, ampersands, hyphens.
fn uppercase_pattern() -> Regex {
    Regex::new(r"^[A-Z][A-Z\s:&-]{4,}$").expect("valid regex")
}
