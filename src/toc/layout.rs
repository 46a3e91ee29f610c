//! Grouping of positioned spans into visual lines.

use std::cmp::Ordering;

use crate::model::Span;

/// Baselines closer than this fraction of the font size share a line.
const LINE_TOLERANCE: f32 = 0.3;
/// Gaps wider than this fraction of a character width become a space.
const SPACE_GAP_RATIO: f32 = 0.2;

/// A visual line: spans sharing one baseline, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// The spans in this line, sorted by X position
    pub spans: Vec<Span>,
    /// 0-based page index
    pub page_index: u32,
    /// Largest span size on the line
    pub font_size: f32,
    /// Whether any span is bold
    pub bold: bool,
}

impl TextLine {
    /// Create a line from spans already known to share a baseline.
    pub fn from_spans(mut spans: Vec<Span>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        let font_size = spans.iter().map(|s| s.font_size).fold(0.0, f32::max);
        let bold = spans.iter().any(|s| s.bold);
        let page_index = spans.first().map(|s| s.page_index).unwrap_or(0);

        Self {
            spans,
            page_index,
            font_size,
            bold,
        }
    }

    /// Combined text of all spans.
    ///
    /// Inserts a space where the horizontal gap between spans is wide
    /// enough, except between two spaceless-script characters.
    pub fn text(&self) -> String {
        let mut result = String::new();

        for (i, span) in self.spans.iter().enumerate() {
            if i > 0 {
                let prev = &self.spans[i - 1];
                let gap = span.x - (prev.x + prev.effective_width());

                let char_count = span.text.chars().count();
                let avg_char_width = if char_count > 0 && span.width > 0.0 {
                    span.width / char_count as f32
                } else {
                    span.font_size * 0.5
                };

                let both_spaceless = matches!(
                    (prev.text.chars().last(), span.text.chars().next()),
                    (Some(a), Some(b)) if is_spaceless_script_char(a) && is_spaceless_script_char(b)
                );
                let has_space = prev.text.ends_with([' ', '\u{00A0}'])
                    || span.text.starts_with([' ', '\u{00A0}']);

                if gap > avg_char_width * SPACE_GAP_RATIO && !both_spaceless && !has_space {
                    result.push(' ');
                }
            }
            result.push_str(&span.text);
        }

        result
    }
}

/// Group one page's spans into lines, top to bottom.
pub fn group_into_lines(mut spans: Vec<Span>) -> Vec<TextLine> {
    // PDF y grows upward, so top-of-page sorts first with descending y
    spans.sort_by(|a, b| match b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal) {
        Ordering::Equal => a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal),
        other => other,
    });

    let mut lines = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_y: Option<f32> = None;

    for span in spans {
        match current_y {
            Some(y) if (span.y - y).abs() <= span.font_size * LINE_TOLERANCE => {
                current.push(span);
            }
            _ => {
                if !current.is_empty() {
                    lines.push(TextLine::from_spans(std::mem::take(&mut current)));
                }
                current_y = Some(span.y);
                current.push(span);
            }
        }
    }

    if !current.is_empty() {
        lines.push(TextLine::from_spans(current));
    }

    lines
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
pub fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and extensions
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana, Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, size: f32, x: f32, y: f32) -> Span {
        Span::new(text, size, false, 0).at(x, y)
    }

    #[test]
    fn test_groups_by_baseline() {
        let lines = group_into_lines(vec![
            span("body", 10.0, 72.0, 680.0),
            span("World", 12.0, 130.0, 701.0),
            span("Hello", 12.0, 72.0, 700.0),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello World");
        assert_eq!(lines[1].text(), "body");
    }

    #[test]
    fn test_line_size_and_bold() {
        let line = TextLine::from_spans(vec![
            Span::new("1.", 10.0, true, 3).at(72.0, 700.0),
            Span::new("Results", 14.0, false, 3).at(90.0, 700.0),
        ]);
        assert_eq!(line.font_size, 14.0);
        assert!(line.bold);
        assert_eq!(line.page_index, 3);
    }

    #[test]
    fn test_adjacent_spans_not_spaced() {
        // "Hel" at 10pt estimates 15pt wide, so "lo" starts flush
        let line = TextLine::from_spans(vec![
            span("Hel", 10.0, 72.0, 700.0),
            span("lo", 10.0, 87.0, 700.0),
        ]);
        assert_eq!(line.text(), "Hello");
    }

    #[test]
    fn test_cjk_not_spaced() {
        let line = TextLine::from_spans(vec![
            span("日本", 10.0, 72.0, 700.0),
            span("語", 10.0, 120.0, 700.0),
        ]);
        assert_eq!(line.text(), "日本語");
    }

    #[test]
    fn test_spaceless_script_chars() {
        assert!(is_spaceless_script_char('中'));
        assert!(is_spaceless_script_char('か'));
        assert!(!is_spaceless_script_char('한'));
        assert!(!is_spaceless_script_char('a'));
    }
}
