//! Per-page image harvesting.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::ExtractedImage;
use crate::options::NavOptions;
use crate::source::DocumentSource;

/// Outcome of [`extract_page_images`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageImages {
    /// The page has no embedded images
    NoImages {
        /// 1-based page number
        page: u32,
    },
    /// Images exist but every one was too small or unreadable
    AllFiltered {
        /// 1-based page number
        page: u32,
        /// Image references found on the page
        found: usize,
        /// Minimum width and height that applied
        min_dimension: u32,
    },
    /// At least one image survived
    Extracted {
        /// 1-based page number
        page: u32,
        /// Surviving images, in reference order
        images: Vec<ExtractedImage>,
        /// Images dropped as too small or unreadable
        skipped: usize,
    },
}

impl PageImages {
    /// 1-based page number.
    pub fn page(&self) -> u32 {
        match self {
            Self::NoImages { page }
            | Self::AllFiltered { page, .. }
            | Self::Extracted { page, .. } => *page,
        }
    }

    /// Surviving images, empty for the other statuses.
    pub fn images(&self) -> &[ExtractedImage] {
        match self {
            Self::Extracted { images, .. } => images,
            _ => &[],
        }
    }
}

/// Extract the images placed on a page (1-based).
///
/// A failing image never aborts the page: it is counted as skipped, as are
/// images smaller than `min_image_dimension` in either direction.
pub fn extract_page_images(
    source: &dyn DocumentSource,
    page: i64,
    options: &NavOptions,
) -> Result<PageImages> {
    let total = source.page_count();
    if page < 1 || page > i64::from(total) {
        return Err(Error::PageOutOfRange { page, total });
    }
    let page = page as u32;

    let refs = source.images(page - 1)?;
    if refs.is_empty() {
        return Ok(PageImages::NoImages { page });
    }

    let min = options.min_image_dimension;
    let mut images = Vec::new();
    let mut skipped = 0;

    for (i, image_ref) in refs.iter().enumerate() {
        let raw = match source.extract_image(image_ref) {
            Ok(raw) if !raw.bytes.is_empty() => raw,
            Ok(_) => {
                log::warn!("page {}: image {} has no data", page, image_ref.name);
                skipped += 1;
                continue;
            }
            Err(e) => {
                log::warn!("page {}: skipping image {}: {}", page, image_ref.name, e);
                skipped += 1;
                continue;
            }
        };

        if raw.width < min || raw.height < min {
            log::debug!(
                "page {}: image {} is {}x{}, below {}px",
                page,
                image_ref.name,
                raw.width,
                raw.height,
                min
            );
            skipped += 1;
            continue;
        }

        images.push(ExtractedImage::from_raw(i + 1, raw));
    }

    if images.is_empty() {
        return Ok(PageImages::AllFiltered {
            page,
            found: refs.len(),
            min_dimension: min,
        });
    }

    Ok(PageImages::Extracted {
        page,
        images,
        skipped,
    })
}
