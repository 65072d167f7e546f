//! Rasterization fallback backend interface.
//!
//! When native transcoding fails, the pipeline can hand the original math
//! source to a rasterizer backend that typesets it into a bitmap. Backends
//! are supplied by the caller; none ships with the library. A process-global
//! backend must be reentrant or serialize its own access, since independent
//! conversions run in parallel.

use crate::error::Result;
use crate::math::DisplayMode;

/// A rasterized math expression.
#[derive(Debug, Clone)]
pub struct RasterizedMath {
    /// Encoded image bytes (PNG or similar)
    pub data: Vec<u8>,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

/// Backend that typesets math source into an image.
///
/// Implementations return `Error::Raster` on failure; the render path
/// degrades to the literal-text representation and logs the error.
pub trait MathRasterizer: Send + Sync {
    /// Rasterize the given math source.
    ///
    /// # Arguments
    /// * `source` - Math source with delimiters already stripped
    /// * `display` - Whether the expression is inline or block-level
    fn rasterize(&self, source: &str, display: DisplayMode) -> Result<RasterizedMath>;

    /// Human-readable backend name, used in log messages.
    fn name(&self) -> &str {
        "rasterizer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct FixedRasterizer;

    impl MathRasterizer for FixedRasterizer {
        fn rasterize(&self, _source: &str, _display: DisplayMode) -> Result<RasterizedMath> {
            Ok(RasterizedMath {
                data: vec![0x89, 0x50, 0x4E, 0x47],
                width: 120,
                height: 24,
            })
        }
    }

    struct BrokenRasterizer;

    impl MathRasterizer for BrokenRasterizer {
        fn rasterize(&self, _source: &str, _display: DisplayMode) -> Result<RasterizedMath> {
            Err(Error::Raster("backend offline".to_string()))
        }
    }

    #[test]
    fn test_rasterizer_trait_objects() {
        let good: Box<dyn MathRasterizer> = Box::new(FixedRasterizer);
        let img = good.rasterize("x^2", DisplayMode::Inline).unwrap();
        assert_eq!(img.width, 120);

        let bad: Box<dyn MathRasterizer> = Box::new(BrokenRasterizer);
        assert!(bad.rasterize("x^2", DisplayMode::Inline).is_err());
    }
}
