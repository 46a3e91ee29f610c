//! Path-based operation surface.
//!
//! A [`Navigator`] resolves file paths through a [`DocumentCache`] and runs
//! the stateless operations from [`reader`](crate::reader),
//! [`search`](crate::search) and [`images`](crate::images) against the cached
//! handle.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cache::DocumentCache;
use crate::error::{Error, Result};
use crate::images::{extract_page_images, PageImages};
use crate::model::{Metadata, Toc};
use crate::options::NavOptions;
use crate::reader::{self, PageRead, SectionRead};
use crate::search::{self, SearchResults};
use crate::source::DocumentSource;
use crate::toc::TocResolver;

/// Overview of a document: size, metadata, outline.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentInfo {
    /// Canonical path, when opened from a file
    pub path: Option<PathBuf>,
    /// Number of pages
    pub page_count: u32,
    /// Document information fields
    pub metadata: Metadata,
    /// Whether the leading pages carry real text (not a scan)
    pub has_text: bool,
    /// The outline
    pub toc: Toc,
}

/// Cheap scanned-vs-text probe: the trimmed text of the first
/// `text_sample_pages` pages must reach `min_text_chars` characters.
pub fn has_extractable_text(source: &dyn DocumentSource, options: &NavOptions) -> bool {
    let sample = source.page_count().min(options.text_sample_pages);
    let chars: usize = (0..sample)
        .map(|i| {
            source
                .raw_text(i)
                .map(|t| t.trim().chars().count())
                .unwrap_or(0)
        })
        .sum();
    chars >= options.min_text_chars
}

/// Gather [`DocumentInfo`] for an opened document.
pub fn document_info(source: &dyn DocumentSource, options: &NavOptions) -> DocumentInfo {
    DocumentInfo {
        path: None,
        page_count: source.page_count(),
        metadata: source.metadata(),
        has_text: has_extractable_text(source, options),
        toc: TocResolver::new()
            .with_parallel(options.parallel)
            .resolve(source),
    }
}

/// Write `markdown` to `<summary_dir>/<pdf stem>_summary.md`.
///
/// Only the PDF path's file name is used; the PDF need not exist.
pub fn save_summary(pdf_path: &Path, markdown: &str, options: &NavOptions) -> Result<PathBuf> {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            Error::InvalidArgument(
                "Could not derive a filename from the given pdf path.".to_string(),
            )
        })?;

    fs::create_dir_all(&options.summary_dir)?;
    let out_file = options.summary_dir.join(format!("{}_summary.md", stem));
    fs::write(&out_file, markdown)?;

    log::info!("summary saved to {}", out_file.display());
    Ok(out_file)
}

/// Runs navigation operations on documents named by path.
#[derive(Debug, Default)]
pub struct Navigator {
    cache: DocumentCache,
    options: NavOptions,
}

impl Navigator {
    /// Navigator with default options and a fresh cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the options.
    pub fn with_options(mut self, options: NavOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a specific document cache.
    pub fn with_cache(mut self, cache: DocumentCache) -> Self {
        self.cache = cache;
        self
    }

    /// The active options.
    pub fn options(&self) -> &NavOptions {
        &self.options
    }

    /// The document cache.
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    /// Metadata, text probe and outline.
    pub fn info<P: AsRef<Path>>(&self, path: P) -> Result<DocumentInfo> {
        let source = self.cache.open(path.as_ref())?;
        let mut info = document_info(source.as_ref(), &self.options);
        info.path = path.as_ref().canonicalize().ok();
        Ok(info)
    }

    /// The outline only.
    pub fn toc<P: AsRef<Path>>(&self, path: P) -> Result<Toc> {
        let source = self.cache.open(path)?;
        Ok(TocResolver::new()
            .with_parallel(self.options.parallel)
            .resolve(source.as_ref()))
    }

    /// Pages `start..=end` (1-based); see [`reader::read_pages`].
    pub fn read_pages<P: AsRef<Path>>(
        &self,
        path: P,
        start: i64,
        end: Option<i64>,
    ) -> Result<PageRead> {
        let source = self.cache.open(path)?;
        reader::read_pages(source.as_ref(), start, end, &self.options)
    }

    /// The section best matching `query`; see [`reader::read_section`].
    pub fn read_section<P: AsRef<Path>>(&self, path: P, query: &str) -> Result<SectionRead> {
        let source = self.cache.open(path)?;
        reader::read_section(source.as_ref(), query, &self.options)
    }

    /// Search the document; `max_results` defaults to the configured value.
    pub fn search<P: AsRef<Path>>(
        &self,
        path: P,
        query: &str,
        max_results: Option<usize>,
    ) -> Result<SearchResults> {
        let source = self.cache.open(path)?;
        let max_results = max_results.unwrap_or(self.options.default_max_results);
        search::search(source.as_ref(), query, max_results, &self.options)
    }

    /// Images on one page (1-based).
    pub fn page_images<P: AsRef<Path>>(&self, path: P, page: i64) -> Result<PageImages> {
        let source = self.cache.open(path)?;
        extract_page_images(source.as_ref(), page, &self.options)
    }

    /// Save a summary next to the configured summary directory.
    pub fn save_summary<P: AsRef<Path>>(&self, pdf_path: P, markdown: &str) -> Result<PathBuf> {
        save_summary(pdf_path.as_ref(), markdown, &self.options)
    }
}
