//! Agent-facing text for each result type.

use std::fmt::{self, Display, Formatter};

use crate::images::PageImages;
use crate::model::Toc;
use crate::navigator::DocumentInfo;
use crate::reader::{PageRead, PageText, SectionRead};
use crate::search::SearchResults;

/// Shown by `info` when the text probe fails.
pub const SCANNED_WARNING: &str = "WARNING: This PDF appears to be scanned or image-only. \
     Text extraction will return little or no content. \
     Consider using OCR tools for this document.";

/// Shown by `info` when the document has no outline.
pub const NO_TOC_HINT: &str = "(No TOC detected. Read the document by page number instead.)";

const EMPTY_PAGE: &str = "(no text on this page)";
const UNREADABLE_PAGE: &str = "(text could not be extracted from this page)";

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("(unknown)")
}

impl Display for Toc {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "=== Table of Contents ===\n{}", NO_TOC_HINT)?;
            return Ok(());
        }
        write!(f, "=== Table of Contents ({} entries) ===", self.len())?;
        for entry in self {
            let indent = "  ".repeat(entry.level.saturating_sub(1) as usize);
            write!(f, "\n{}{}  [page {}]", indent, entry.title, entry.page)?;
        }
        Ok(())
    }
}

impl Display for DocumentInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let meta = &self.metadata;
        writeln!(f, "=== PDF Info ===")?;
        match &self.path {
            Some(path) => writeln!(f, "File: {}", path.display())?,
            None => writeln!(f, "File: (in memory)")?,
        }
        writeln!(f, "Pages: {}", self.page_count)?;
        writeln!(f, "Title: {}", or_unknown(meta.title.as_deref()))?;
        writeln!(f, "Author: {}", or_unknown(meta.author.as_deref()))?;
        writeln!(f, "Subject: {}", or_unknown(meta.subject.as_deref()))?;
        writeln!(f, "Creation Date: {}", or_unknown(meta.creation_date.as_deref()))?;
        writeln!(f, "Has Extractable Text: {}", self.has_text)?;
        if !self.has_text {
            writeln!(f)?;
            writeln!(f, "{}", SCANNED_WARNING)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.toc)
    }
}

impl Display for PageText {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let body = if !self.readable {
            UNREADABLE_PAGE
        } else if self.text.is_empty() {
            EMPTY_PAGE
        } else {
            self.text.as_str()
        };
        write!(f, "--- Page {} ---\n\n{}", self.page, body)
    }
}

fn write_pages(f: &mut Formatter<'_>, pages: &[PageText], unreadable: usize) -> fmt::Result {
    if unreadable > 0 {
        write!(f, "\n({} page(s) could not be extracted.)", unreadable)?;
    }
    for page in pages {
        write!(f, "\n\n{}", page)?;
    }
    Ok(())
}

impl Display for PageRead {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Pages {}-{} of {} | {} page(s) | {} chars]",
            self.start,
            self.end,
            self.total_pages,
            self.page_count(),
            self.char_count()
        )?;
        write_pages(f, &self.pages, self.unreadable_count())
    }
}

impl Display for SectionRead {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Section: \"{}\" | Pages {}-{} | {} page(s) | {} chars]",
            self.title,
            self.range.start + 1,
            self.range.end,
            self.page_count(),
            self.char_count()
        )?;
        if self.truncated {
            write!(
                f,
                "\n(Section truncated to {} pages. Read the remaining pages by page number.)",
                self.max_pages
            )?;
        }
        write_pages(f, &self.pages, self.unreadable_count())
    }
}

impl Display for SearchResults {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No results found for \"{}\".", self.query);
        }

        let breakdown = self
            .pages
            .iter()
            .map(|p| format!("p.{}({})", p.page, p.count))
            .collect::<Vec<_>>()
            .join(", ");
        write!(
            f,
            "[Search: \"{}\" | {} hit(s) across {} page(s): {}]",
            self.query,
            self.total_hits,
            self.pages.len(),
            breakdown
        )?;
        if self.is_capped() {
            write!(
                f,
                "\n(Showing first {} of {} matches.)",
                self.max_results, self.total_hits
            )?;
        }
        for hit in &self.hits {
            write!(f, "\n\n{}", hit)?;
        }
        Ok(())
    }
}

impl Display for PageImages {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PageImages::NoImages { page } => write!(f, "No images found on page {}.", page),
            PageImages::AllFiltered {
                page,
                found,
                min_dimension,
            } => write!(
                f,
                "Page {} has {} image(s) but all were too small (<{}x{}px) or unreadable.",
                page, found, min_dimension, min_dimension
            ),
            PageImages::Extracted {
                page,
                images,
                skipped,
            } => {
                write!(f, "[Page {}: {} image(s) extracted", page, images.len())?;
                if *skipped > 0 {
                    write!(f, ", {} skipped (too small/unreadable)", skipped)?;
                }
                write!(f, "]")?;
                for image in images {
                    write!(f, "\n{}", image.caption())?;
                }
                Ok(())
            }
        }
    }
}
