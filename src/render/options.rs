//! Rendering options and configuration.

use crate::math::MathRasterizer;
use std::fmt;
use std::sync::Arc;

/// Options for rendering markup into the document model.
///
/// Variant quirks of the dialect (checklist glyphs, placement of block-mode
/// math found mid-paragraph) are expressed here as flags, not separate code
/// paths.
#[derive(Clone)]
pub struct RenderOptions {
    /// Maximum heading level; deeper headings are clamped, never rejected
    pub max_heading_level: u8,

    /// Paragraph content equal to this literal becomes a page break
    pub page_break_marker: String,

    /// Glyph substituted for a leading `[ ]` in list items
    pub unchecked_glyph: char,

    /// Glyph substituted for a leading `[x]` in list items
    pub checked_glyph: char,

    /// Whether block-mode math found mid-paragraph starts its own centered
    /// paragraph (`true`) or stays embedded in the current one
    pub split_paragraph_on_block_math: bool,

    /// Maximum display width for images, in pixels
    pub image_max_width: u32,

    /// Font for code lines and literal math fallback text
    pub monospace_font: String,

    /// Hyperlink text color (hex RGB)
    pub link_color: String,

    /// Canonical text color forced onto built-in styles by normalization
    pub text_color: String,

    /// Rasterizer backend for the math fallback tier; `None` degrades
    /// straight to literal text
    pub rasterizer: Option<Arc<dyn MathRasterizer>>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 9);
        self
    }

    /// Set the reserved page-break marker literal.
    pub fn with_page_break_marker(mut self, marker: impl Into<String>) -> Self {
        self.page_break_marker = marker.into();
        self
    }

    /// Set the checklist glyphs (unchecked, checked).
    pub fn with_checklist_glyphs(mut self, unchecked: char, checked: char) -> Self {
        self.unchecked_glyph = unchecked;
        self.checked_glyph = checked;
        self
    }

    /// Choose whether mid-paragraph block math splits the paragraph.
    pub fn with_block_math_split(mut self, split: bool) -> Self {
        self.split_paragraph_on_block_math = split;
        self
    }

    /// Set the maximum image display width in pixels.
    pub fn with_image_max_width(mut self, width: u32) -> Self {
        self.image_max_width = width.max(1);
        self
    }

    /// Set the monospace font name.
    pub fn with_monospace_font(mut self, font: impl Into<String>) -> Self {
        self.monospace_font = font.into();
        self
    }

    /// Set the hyperlink color (hex RGB).
    pub fn with_link_color(mut self, color: impl Into<String>) -> Self {
        self.link_color = color.into();
        self
    }

    /// Set the canonical text color applied by style normalization.
    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = color.into();
        self
    }

    /// Install a rasterizer backend for the math fallback tier.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn MathRasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    /// The rasterizer as a trait-object reference, if installed.
    pub(crate) fn rasterizer_ref(&self) -> Option<&dyn MathRasterizer> {
        self.rasterizer.as_deref()
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_heading_level: 9,
            page_break_marker: "\\newpage".to_string(),
            unchecked_glyph: '☐',
            checked_glyph: '☑',
            split_paragraph_on_block_math: true,
            image_max_width: 600,
            monospace_font: "Consolas".to_string(),
            link_color: "0000FF".to_string(),
            text_color: "000000".to_string(),
            rasterizer: None,
        }
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("max_heading_level", &self.max_heading_level)
            .field("page_break_marker", &self.page_break_marker)
            .field("unchecked_glyph", &self.unchecked_glyph)
            .field("checked_glyph", &self.checked_glyph)
            .field(
                "split_paragraph_on_block_math",
                &self.split_paragraph_on_block_math,
            )
            .field("image_max_width", &self.image_max_width)
            .field("monospace_font", &self.monospace_font)
            .field("link_color", &self.link_color)
            .field("text_color", &self.text_color)
            .field("rasterizer", &self.rasterizer.as_ref().map(|r| r.name()))
            .finish()
    }
}
