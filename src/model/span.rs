//! Positioned text spans.

use serde::{Deserialize, Serialize};

/// A run of text sharing one font, with its position on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Font size in points (after text-matrix scaling)
    pub font_size: f32,
    /// Whether the font appears to be bold
    pub bold: bool,
    /// 0-based page index
    pub page_index: u32,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline, grows upward)
    pub y: f32,
    /// Width of the text, 0 when unknown
    pub width: f32,
}

impl Span {
    /// Create a span at the page origin.
    pub fn new(text: impl Into<String>, font_size: f32, bold: bool, page_index: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            bold,
            page_index,
            x: 0.0,
            y: 0.0,
            width: 0.0,
        }
    }

    /// Create a span, inferring boldness from the font's base name
    /// (e.g., "Helvetica-Bold", "Inter-Black").
    pub fn with_font_name(
        text: impl Into<String>,
        font_size: f32,
        font_name: &str,
        page_index: u32,
    ) -> Self {
        Self::new(text, font_size, is_bold_font_name(font_name), page_index)
    }

    /// Place the span at a position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set the measured width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Width, estimated from the character count when not measured.
    pub fn effective_width(&self) -> f32 {
        if self.width > 0.0 {
            self.width
        } else {
            self.text.chars().count() as f32 * self.font_size * 0.5
        }
    }
}

/// Guess boldness from a base font name.
pub fn is_bold_font_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.contains("bold") || lower.contains("black") || lower.contains("heavy")
}
