//! Navigation limits and thresholds.

use std::path::PathBuf;

/// Options shared by every navigation operation.
///
/// The page and result caps keep each response within a bounded size;
/// hitting a cap is reported in the result, never as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct NavOptions {
    /// Most pages returned by one page-range read
    pub max_pages_per_read: u32,

    /// Most pages returned by one section read
    pub max_pages_per_section: u32,

    /// Characters of context on each side of a search match
    pub snippet_context: usize,

    /// Snippets returned when the caller gives no limit
    pub default_max_results: usize,

    /// Images narrower or shorter than this many pixels are skipped
    pub min_image_dimension: u32,

    /// Pages sampled when deciding whether a document has text
    pub text_sample_pages: u32,

    /// Characters the sampled pages must hold to count as text
    pub min_text_chars: usize,

    /// Section titles suggested when a section lookup fails
    pub max_suggestions: usize,

    /// Whether to fan per-page work out over rayon
    pub parallel: bool,

    /// Directory that saved summaries are written to
    pub summary_dir: PathBuf,
}

impl NavOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page cap for page-range reads (at least 1).
    pub fn with_max_pages_per_read(mut self, pages: u32) -> Self {
        self.max_pages_per_read = pages.max(1);
        self
    }

    /// Set the page cap for section reads (at least 1).
    pub fn with_max_pages_per_section(mut self, pages: u32) -> Self {
        self.max_pages_per_section = pages.max(1);
        self
    }

    /// Set the snippet context width.
    pub fn with_snippet_context(mut self, chars: usize) -> Self {
        self.snippet_context = chars;
        self
    }

    /// Set the default number of search snippets.
    pub fn with_default_max_results(mut self, results: usize) -> Self {
        self.default_max_results = results;
        self
    }

    /// Set the minimum image width and height.
    pub fn with_min_image_dimension(mut self, pixels: u32) -> Self {
        self.min_image_dimension = pixels;
        self
    }

    /// Set the extractable-text probe.
    pub fn with_text_probe(mut self, pages: u32, min_chars: usize) -> Self {
        self.text_sample_pages = pages;
        self.min_text_chars = min_chars;
        self
    }

    /// Set how many titles a failed section lookup suggests.
    pub fn with_max_suggestions(mut self, suggestions: usize) -> Self {
        self.max_suggestions = suggestions;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the summary output directory.
    pub fn with_summary_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.summary_dir = dir.into();
        self
    }
}

impl Default for NavOptions {
    fn default() -> Self {
        Self {
            max_pages_per_read: 10,
            max_pages_per_section: 15,
            snippet_context: 100,
            default_max_results: 10,
            min_image_dimension: 50,
            text_sample_pages: 5,
            min_text_chars: 50,
            max_suggestions: 20,
            parallel: true,
            summary_dir: PathBuf::from("Summaries"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = NavOptions::default();
        assert_eq!(options.max_pages_per_read, 10);
        assert_eq!(options.max_pages_per_section, 15);
        assert_eq!(options.snippet_context, 100);
        assert_eq!(options.default_max_results, 10);
        assert_eq!(options.min_image_dimension, 50);
        assert_eq!(options.max_suggestions, 20);
        assert!(options.parallel);
        assert_eq!(options.summary_dir, PathBuf::from("Summaries"));
    }

    #[test]
    fn test_builder() {
        let options = NavOptions::new()
            .with_max_pages_per_read(3)
            .with_text_probe(2, 10)
            .with_summary_dir("/tmp/out")
            .sequential();
        assert_eq!(options.max_pages_per_read, 3);
        assert_eq!(options.text_sample_pages, 2);
        assert_eq!(options.min_text_chars, 10);
        assert!(!options.parallel);
    }

    #[test]
    fn test_page_caps_never_zero() {
        let options = NavOptions::new()
            .with_max_pages_per_read(0)
            .with_max_pages_per_section(0);
        assert_eq!(options.max_pages_per_read, 1);
        assert_eq!(options.max_pages_per_section, 1);
    }
}
