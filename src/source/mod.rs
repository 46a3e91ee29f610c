//! Document source abstraction layer.
//!
//! Provides a trait-based interface for raw document access, isolating the
//! concrete PDF library (lopdf) from the navigation logic. Everything in
//! [`toc`](crate::toc), [`reader`](crate::reader), [`search`](crate::search)
//! and [`images`](crate::images) is written against [`DocumentSource`].

mod lopdf_source;
mod memory;

pub use lopdf_source::LopdfSource;
pub use memory::{MemoryPage, MemorySource};

use std::ops::Range;

use rayon::prelude::*;

use crate::error::Result;
use crate::model::{ImageRef, Metadata, OutlineEntry, RawImage, Span};

/// Abstract interface for read-only document access.
///
/// Page indices are 0-based. Implementations must tolerate concurrent calls
/// through `&self`; navigation operations share one handle across callers.
pub trait DocumentSource: Send + Sync {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Plain text of a page, in reading order as the parser sees it.
    fn raw_text(&self, page_index: u32) -> Result<String>;

    /// Positioned text spans of a page with font metrics.
    fn text_spans(&self, page_index: u32) -> Result<Vec<Span>>;

    /// The embedded outline as `(level, title, page)` entries, 1-based levels
    /// and pages. Titles are untrimmed; empty when the format has none.
    fn native_outline(&self) -> Result<Vec<OutlineEntry>>;

    /// Image references placed on a page, in resource order.
    fn images(&self, page_index: u32) -> Result<Vec<ImageRef>>;

    /// Decode one referenced image.
    fn extract_image(&self, image: &ImageRef) -> Result<RawImage>;

    /// Document information fields.
    fn metadata(&self) -> Metadata;
}

/// Run `f` over a range of page indices, on the rayon pool when `parallel`.
///
/// Results come back in page order either way.
pub(crate) fn map_pages<T, F>(pages: Range<u32>, parallel: bool, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(u32) -> T + Send + Sync,
{
    if parallel && pages.len() > 1 {
        pages.into_par_iter().map(f).collect()
    } else {
        pages.map(f).collect()
    }
}

/// Simple text decoding fallback when no font encoding is available.
///
/// Handles UTF-16BE with BOM, then UTF-8, then Latin-1.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}
