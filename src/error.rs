//! Error types for pdfnav.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pdfnav operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while navigating a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The requested file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file is not a PDF.
    #[error("Not a PDF file: {0}")]
    InvalidFormat(String),

    /// The byte stream does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF version is not supported.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Page number is out of range.
    #[error("page {page} out of range (1-{total}).")]
    PageOutOfRange {
        /// Requested 1-based page number
        page: i64,
        /// Number of pages in the document
        total: u32,
    },

    /// The caller supplied an unusable argument (empty query, inverted range).
    #[error("{0}")]
    InvalidArgument(String),

    /// The document carries no outline and no headings could be detected.
    #[error(
        "No table of contents or section headings detected in this PDF. \
         Read it by page number instead."
    )]
    NoOutline,

    /// The section query did not resolve to any outline entry.
    #[error("Section \"{query}\" not found.\nAvailable sections: {}", quote_list(.suggestions))]
    SectionNotFound {
        /// The query as given by the caller
        query: String,
        /// Leading outline titles offered as alternatives
        suggestions: Vec<String>,
    },

    /// Error extracting a single embedded image.
    #[error("Image extraction error: {0}")]
    ImageExtract(String),

    /// Error extracting text content.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error while rendering a result (JSON serialization).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller can act on this error without changing documents
    /// (pick another section, fall back to page reads).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::NoOutline | Error::SectionNotFound { .. })
    }
}

fn quote_list(items: &[String]) -> String {
    items
        .iter()
        .map(|s| format!("\"{}\"", s))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
