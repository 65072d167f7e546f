//! # mdocx
//!
//! Rendering engine turning a Markdown-like dialect into a structured
//! word-processing document model.
//!
//! Markup text is tokenized into a well-nested block token stream, rendered
//! in a single forward pass into ordered document blocks with styled runs,
//! and finished with a style-normalization pass. Embedded math goes through
//! a three-tier transcoding pipeline (editable OMML, rasterized image,
//! literal text) that never fails hard; serialization of the finished model
//! to a concrete file format is out of scope and attaches via the visitor
//! seam.
//!
//! ## Quick Start
//!
//! ```
//! use mdocx::{convert_str, DocumentBlock};
//!
//! let doc = convert_str("# Hello\n\nThe identity $e^{i\\pi} + 1 = 0$ holds.")?;
//! assert!(matches!(doc.blocks[0], DocumentBlock::Heading { level: 1, .. }));
//! # Ok::<(), mdocx::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Dialect coverage**: headings, lists with checklists, blockquotes,
//!   tables, code fences, thematic breaks, page-break markers, images
//! - **Inline grammar**: emphasis, strikethrough, inline code, hyperlinks,
//!   `$…$` / `$$…$$` math with `\$` escapes
//! - **Graceful degradation**: malformed input never aborts a render
//! - **Parallel batch conversion**: independent inputs convert across
//!   threads via Rayon

pub mod error;
pub mod math;
pub mod model;
pub mod render;
pub mod token;

// Re-export commonly used types
pub use error::{Error, Result};
pub use math::{
    DisplayMode, MathExpression, MathRasterizer, MathRepresentation, RasterizedMath,
};
pub use model::{
    walk_document, DocumentBlock, DocumentModel, DocumentVisitor, ImageMap, ListKind, MathSpan,
    Run, StyleSheet, TableCell, TextRun, VisitorAction,
};
pub use render::{BlockRenderer, InlineRenderer, RenderOptions};
pub use token::{tokenize, Token, TokenCursor, TokenKind};

use rayon::prelude::*;

/// Convert markup text with default options and no images.
///
/// # Example
///
/// ```
/// let doc = mdocx::convert_str("**bold** statement").unwrap();
/// assert_eq!(doc.plain_text(), "bold statement");
/// ```
pub fn convert_str(markup: &str) -> Result<DocumentModel> {
    render::render(markup, &RenderOptions::default(), &ImageMap::new())
}

/// Convert markup text with custom options.
///
/// # Example
///
/// ```
/// use mdocx::RenderOptions;
///
/// let options = RenderOptions::new().with_max_heading(3);
/// let doc = mdocx::convert_str_with_options("##### deep", &options).unwrap();
/// ```
pub fn convert_str_with_options(markup: &str, options: &RenderOptions) -> Result<DocumentModel> {
    render::render(markup, options, &ImageMap::new())
}

/// Convert markup text with custom options and an image map.
pub fn convert_with_images(
    markup: &str,
    options: &RenderOptions,
    images: &ImageMap,
) -> Result<DocumentModel> {
    render::render(markup, options, images)
}

/// Convert independent markup inputs in parallel.
///
/// Each conversion carries its own state; results come back in input order.
pub fn convert_batch(inputs: &[&str], options: &RenderOptions) -> Vec<Result<DocumentModel>> {
    inputs
        .par_iter()
        .map(|markup| render::render(markup, options, &ImageMap::new()))
        .collect()
}

/// Builder for configuring and running conversions.
///
/// # Example
///
/// ```
/// use mdocx::Mdocx;
///
/// let doc = Mdocx::new()
///     .with_max_heading(6)
///     .with_block_math_split(false)
///     .convert("# Title\n\nBody")?;
/// # Ok::<(), mdocx::Error>(())
/// ```
pub struct Mdocx {
    options: RenderOptions,
    images: ImageMap,
}

impl Mdocx {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: RenderOptions::default(),
            images: ImageMap::new(),
        }
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.options = self.options.with_max_heading(level);
        self
    }

    /// Set the reserved page-break marker literal.
    pub fn with_page_break_marker(mut self, marker: impl Into<String>) -> Self {
        self.options = self.options.with_page_break_marker(marker);
        self
    }

    /// Set the checklist glyphs (unchecked, checked).
    pub fn with_checklist_glyphs(mut self, unchecked: char, checked: char) -> Self {
        self.options = self.options.with_checklist_glyphs(unchecked, checked);
        self
    }

    /// Choose whether mid-paragraph block math splits the paragraph.
    pub fn with_block_math_split(mut self, split: bool) -> Self {
        self.options = self.options.with_block_math_split(split);
        self
    }

    /// Set the maximum image display width in pixels.
    pub fn with_image_max_width(mut self, width: u32) -> Self {
        self.options = self.options.with_image_max_width(width);
        self
    }

    /// Install a rasterizer backend for the math fallback tier.
    pub fn with_rasterizer(mut self, rasterizer: std::sync::Arc<dyn MathRasterizer>) -> Self {
        self.options = self.options.with_rasterizer(rasterizer);
        self
    }

    /// Add an image as raw bytes (a named binary attachment).
    pub fn with_image(mut self, id: impl Into<String>, data: Vec<u8>) -> Self {
        self.images.insert(id, data);
        self
    }

    /// Add an image as an inline base64-encoded value.
    pub fn with_image_base64(mut self, id: impl Into<String>, encoded: &str) -> Result<Self> {
        self.images.insert_base64(id, encoded)?;
        Ok(self)
    }

    /// Access the configured render options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Convert markup text with the configured options and images.
    pub fn convert(&self, markup: &str) -> Result<DocumentModel> {
        render::render(markup, &self.options, &self.images)
    }
}

impl Default for Mdocx {
    fn default() -> Self {
        Self::new()
    }
}
