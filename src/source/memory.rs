//! In-memory [`DocumentSource`].
//!
//! Lets callers plug in content produced by another parser, and gives tests a
//! document whose typography is fully controlled.

use super::DocumentSource;
use crate::error::{Error, Result};
use crate::model::{ImageRef, Metadata, OutlineEntry, RawImage, Span};

const LEFT_MARGIN: f32 = 72.0;
const TOP_BASELINE: f32 = 800.0;
const LINE_ADVANCE: f32 = 20.0;
const BODY_SIZE: f32 = 10.0;

/// A page of a [`MemorySource`].
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    lines: Vec<Vec<Span>>,
    text: Option<String>,
    unreadable: bool,
    images: Vec<Option<RawImage>>,
}

impl MemoryPage {
    /// Create an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Page whose raw text is `text`, each non-blank line typeset at body size.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut page = Self::new();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            page = page.line(line, BODY_SIZE, false);
        }
        page.with_text(text)
    }

    /// Append a single-span line below the previous one.
    pub fn line(self, text: impl Into<String>, font_size: f32, bold: bool) -> Self {
        self.spans_line(vec![Span::new(text, font_size, bold, 0)])
    }

    /// Append a line made of several spans, laid out left to right.
    pub fn spans_line(mut self, spans: Vec<Span>) -> Self {
        let y = TOP_BASELINE - self.lines.len() as f32 * LINE_ADVANCE;
        let mut x = LEFT_MARGIN;
        let placed = spans
            .into_iter()
            .map(|span| {
                let span = span.at(x, y);
                x += span.effective_width() + span.font_size * 0.25;
                span
            })
            .collect();
        self.lines.push(placed);
        self
    }

    /// Override the raw text (otherwise the lines joined by newlines).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Make text extraction fail for this page.
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    /// Place an image with placeholder bytes.
    pub fn image(self, width: u32, height: u32, format: impl Into<String>) -> Self {
        let bytes = vec![0u8; 16];
        self.raw_image(RawImage::new(bytes, width, height, format))
    }

    /// Place an image with explicit bytes.
    pub fn raw_image(mut self, image: RawImage) -> Self {
        self.images.push(Some(image));
        self
    }

    /// Place an image whose extraction fails.
    pub fn broken_image(mut self) -> Self {
        self.images.push(None);
        self
    }

    fn raw_text(&self) -> String {
        if let Some(text) = &self.text {
            return text.clone();
        }
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|s| s.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A document held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<MemoryPage>,
    outline: Vec<OutlineEntry>,
    metadata: Metadata,
}

impl MemorySource {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with one plain-text page per item.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .fold(Self::new(), |doc, text| doc.page(MemoryPage::from_text(text)))
    }

    /// Append a page.
    pub fn page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Append an embedded outline entry (untrimmed titles allowed).
    pub fn outline_entry(mut self, level: u32, title: impl Into<String>, page: u32) -> Self {
        self.outline.push(OutlineEntry::new(level, title, page));
        self
    }

    /// Set document information.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn get_page(&self, page_index: u32) -> Result<&MemoryPage> {
        self.pages
            .get(page_index as usize)
            .ok_or(Error::PageOutOfRange {
                page: i64::from(page_index) + 1,
                total: self.page_count(),
            })
    }

    fn readable_page(&self, page_index: u32) -> Result<&MemoryPage> {
        let page = self.get_page(page_index)?;
        if page.unreadable {
            return Err(Error::TextExtract(format!(
                "Page {}: unreadable",
                page_index + 1
            )));
        }
        Ok(page)
    }
}

impl DocumentSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn raw_text(&self, page_index: u32) -> Result<String> {
        Ok(self.readable_page(page_index)?.raw_text())
    }

    fn text_spans(&self, page_index: u32) -> Result<Vec<Span>> {
        let page = self.readable_page(page_index)?;
        Ok(page
            .lines
            .iter()
            .flatten()
            .cloned()
            .map(|mut span| {
                span.page_index = page_index;
                span
            })
            .collect())
    }

    fn native_outline(&self) -> Result<Vec<OutlineEntry>> {
        Ok(self.outline.clone())
    }

    fn images(&self, page_index: u32) -> Result<Vec<ImageRef>> {
        let page = self.get_page(page_index)?;
        Ok((0..page.images.len())
            .map(|i| ImageRef::new(page_index, format!("Im{}", i)))
            .collect())
    }

    fn extract_image(&self, image: &ImageRef) -> Result<RawImage> {
        let page = self.get_page(image.page_index)?;
        image
            .name
            .strip_prefix("Im")
            .and_then(|i| i.parse::<usize>().ok())
            .and_then(|i| page.images.get(i))
            .and_then(|img| img.clone())
            .ok_or_else(|| Error::ImageExtract(format!("cannot decode {}", image.name)))
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }
}
