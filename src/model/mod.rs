//! Data model for document navigation.
//!
//! Everything here is a read-only projection of a
//! [`DocumentSource`](crate::source::DocumentSource); nothing is persisted.

mod hit;
mod image;
mod metadata;
mod outline;
mod span;

pub use hit::SearchHit;
pub use image::{mime_for_format, ExtractedImage, ImageRef, RawImage};
pub use metadata::{parse_pdf_date, Metadata};
pub use outline::{OutlineEntry, SectionRange, Toc, TocSource};
pub use span::{is_bold_font_name, Span};
