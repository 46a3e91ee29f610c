//! Embedded image types.

use serde::{Deserialize, Serialize};

/// Reference to an image embedded on a page.
///
/// Opaque to everything except the [`DocumentSource`](crate::source::DocumentSource)
/// that produced it; the extractor hands it back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    /// 0-based page the image is placed on
    pub page_index: u32,

    /// Resource name on the page (e.g., "Im0")
    pub name: String,

    /// Backing object id, when the source is an object-based format
    pub object_id: Option<(u32, u16)>,
}

impl ImageRef {
    /// Create a reference by resource name.
    pub fn new(page_index: u32, name: impl Into<String>) -> Self {
        Self {
            page_index,
            name: name.into(),
            object_id: None,
        }
    }

    /// Attach the backing object id.
    pub fn with_object_id(mut self, id: (u32, u16)) -> Self {
        self.object_id = Some(id);
        self
    }
}

/// Image bytes as decoded by a document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    /// Encoded image data
    pub bytes: Vec<u8>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Short format name (e.g., "png", "jpeg", "jpx")
    pub format: String,
}

impl RawImage {
    /// Create a raw image.
    pub fn new(bytes: Vec<u8>, width: u32, height: u32, format: impl Into<String>) -> Self {
        Self {
            bytes,
            width,
            height,
            format: format.into(),
        }
    }
}

/// An image that survived extraction and size filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedImage {
    /// 1-based position among the page's image references
    pub index: usize,

    /// Encoded image data
    #[serde(skip_serializing, default)]
    pub bytes: Vec<u8>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Short format name
    pub format: String,

    /// MIME type derived from `format`
    pub mime_type: String,
}

impl ExtractedImage {
    /// Build from a raw image at the given 1-based position.
    pub fn from_raw(index: usize, raw: RawImage) -> Self {
        let mime_type = mime_for_format(&raw.format);
        Self {
            index,
            bytes: raw.bytes,
            width: raw.width,
            height: raw.height,
            format: raw.format,
            mime_type,
        }
    }

    /// Caption shown next to the image.
    pub fn caption(&self) -> String {
        format!(
            "[Image {}: {}x{}px, format={}]",
            self.index, self.width, self.height, self.format
        )
    }

    /// Size of the encoded data in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// File extension for saving the image.
    pub fn extension(&self) -> &str {
        match self.format.as_str() {
            "jpeg" => "jpg",
            other => other,
        }
    }
}

/// Map a short format name to a MIME type.
///
/// Unknown formats degrade to `image/<format>`.
pub fn mime_for_format(format: &str) -> String {
    let known = match format {
        "png" => "image/png",
        "jpeg" | "jpg" => "image/jpeg",
        "jxr" => "image/jxr",
        "jpx" => "image/jpx",
        "bmp" => "image/bmp",
        "tiff" => "image/tiff",
        other => return format!("image/{}", other),
    };
    known.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_table() {
        assert_eq!(mime_for_format("png"), "image/png");
        assert_eq!(mime_for_format("jpg"), "image/jpeg");
        assert_eq!(mime_for_format("jpeg"), "image/jpeg");
        assert_eq!(mime_for_format("jpx"), "image/jpx");
        assert_eq!(mime_for_format("tiff"), "image/tiff");
    }

    #[test]
    fn test_unknown_format_degrades() {
        assert_eq!(mime_for_format("jb2"), "image/jb2");
        assert_eq!(mime_for_format("webp"), "image/webp");
    }

    #[test]
    fn test_caption_and_extension() {
        let image = ExtractedImage::from_raw(3, RawImage::new(vec![1, 2, 3], 200, 100, "jpeg"));
        assert_eq!(image.caption(), "[Image 3: 200x100px, format=jpeg]");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.extension(), "jpg");
        assert_eq!(image.size(), 3);
    }
}
