//! # pdfnav
//!
//! Incremental navigation of long PDF documents for context-limited readers.
//!
//! Instead of loading a whole paper at once, a caller asks for the outline
//! first and then pulls bounded slices: a page range, a named section, a
//! set of search snippets, or the images on one page. Every slice is capped
//! and reports when it was cut short, so the caller can ask for more.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdfnav::Navigator;
//!
//! fn main() -> pdfnav::Result<()> {
//!     let nav = Navigator::new();
//!
//!     // Outline first
//!     println!("{}", nav.info("paper.pdf")?);
//!
//!     // Then bounded reads
//!     println!("{}", nav.read_section("paper.pdf", "introduction")?);
//!     println!("{}", nav.search("paper.pdf", "attention", Some(5))?);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Outline resolution**: embedded outline first, typography-based
//!   heading detection as fallback
//! - **Fuzzy section lookup**: exact, substring and word-overlap matching
//! - **Bounded reads**: page and section caps with explicit truncation notes
//! - **Search**: case-insensitive, every match counted, capped snippets
//! - **Images**: per-page extraction with size filtering
//! - **Document cache**: each file parsed once per process
//! - **Pluggable sources**: anything implementing [`DocumentSource`]

pub mod cache;
pub mod detect;
pub mod error;
pub mod images;
pub mod model;
pub mod navigator;
pub mod options;
pub mod reader;
pub mod render;
pub mod search;
pub mod source;
pub mod toc;

// Re-export commonly used types
pub use cache::{DocumentCache, KeepForever, MaxEntries, RetentionPolicy, SharedSource};
pub use detect::{detect_format_from_bytes, detect_format_from_path, resolve_pdf_path, PdfFormat};
pub use error::{Error, Result};
pub use images::{extract_page_images, PageImages};
pub use model::{
    ExtractedImage, ImageRef, Metadata, OutlineEntry, RawImage, SearchHit, SectionRange, Span,
    Toc, TocSource,
};
pub use navigator::{document_info, has_extractable_text, DocumentInfo, Navigator};
pub use options::NavOptions;
pub use reader::{read_section_in, PageRead, PageText, SectionRead};
pub use render::{to_json, JsonFormat};
pub use search::{PageHits, SearchResults};
pub use source::{DocumentSource, LopdfSource, MemoryPage, MemorySource};
pub use toc::{find_section, get_toc, HeadingDetector, SectionMatch, TocResolver};

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The process-wide navigator behind the free functions below.
fn shared() -> &'static Navigator {
    static NAVIGATOR: OnceLock<Navigator> = OnceLock::new();
    NAVIGATOR.get_or_init(Navigator::new)
}

/// Open a PDF file without caching.
///
/// # Example
///
/// ```no_run
/// use pdfnav::{open_file, DocumentSource};
///
/// let doc = open_file("paper.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<LopdfSource> {
    let path = resolve_pdf_path(path)?;
    LopdfSource::open(path)
}

/// Open a PDF from bytes.
pub fn open_bytes(data: &[u8]) -> Result<LopdfSource> {
    detect_format_from_bytes(data)?;
    LopdfSource::from_bytes(data)
}

/// Open a PDF from a reader.
pub fn open_reader<R: Read>(mut reader: R) -> Result<LopdfSource> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    open_bytes(&data)
}

/// Metadata, text probe and outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// let info = pdfnav::info("paper.pdf").unwrap();
/// for entry in &info.toc {
///     println!("{} (p. {})", entry.title, entry.page);
/// }
/// ```
pub fn info<P: AsRef<Path>>(path: P) -> Result<DocumentInfo> {
    shared().info(path)
}

/// Read pages `start..=end` (1-based) of a PDF file.
///
/// `end` of `None` or `0` reads only `start`; at most 10 pages are returned.
pub fn read_pages<P: AsRef<Path>>(path: P, start: i64, end: Option<i64>) -> Result<PageRead> {
    shared().read_pages(path, start, end)
}

/// Read the section of a PDF file whose title best matches `query`.
///
/// # Example
///
/// ```no_run
/// match pdfnav::read_section("paper.pdf", "related work") {
///     Ok(section) => println!("{}", section),
///     Err(e) if e.is_recoverable() => eprintln!("{}", e),
///     Err(e) => panic!("{}", e),
/// }
/// ```
pub fn read_section<P: AsRef<Path>>(path: P, query: &str) -> Result<SectionRead> {
    shared().read_section(path, query)
}

/// Search a PDF file, returning at most `max_results` snippets (default 10).
pub fn search<P: AsRef<Path>>(
    path: P,
    query: &str,
    max_results: Option<usize>,
) -> Result<SearchResults> {
    shared().search(path, query, max_results)
}

/// Images on one page (1-based) of a PDF file.
pub fn page_images<P: AsRef<Path>>(path: P, page: i64) -> Result<PageImages> {
    shared().page_images(path, page)
}

/// Save a Markdown summary as `Summaries/<pdf stem>_summary.md`.
pub fn save_summary<P: AsRef<Path>>(pdf_path: P, markdown: &str) -> Result<PathBuf> {
    shared().save_summary(pdf_path, markdown)
}
