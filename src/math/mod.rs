//! Three-tier math transcoding pipeline.
//!
//! Math source is transcoded into the best representation available:
//!
//! 1. **Native** — the source is parsed as LaTeX, converted to presentation
//!    MathML, and mapped onto an editable OMML fragment.
//! 2. **Fallback image** — on any native failure, the original source is
//!    handed to a caller-supplied [`MathRasterizer`].
//! 3. **Fallback text** — with no rasterizer (or a failing one), the source
//!    survives as literal monospaced text.
//!
//! The pipeline never propagates a hard failure: the worst case is the
//! original source rendered verbatim.

mod omml;
mod raster;

pub use omml::{mathml_to_omml, OMML_NS};
pub use raster::{MathRasterizer, RasterizedMath};

use crate::error::{Error, Result};
use latex2mathml::{latex_to_mathml, DisplayStyle};
use serde::{Deserialize, Serialize};

/// Whether a math expression is rendered inline or as its own block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Embedded in the surrounding run sequence
    #[default]
    Inline,
    /// Centered in its own paragraph
    Block,
}

/// A math occurrence awaiting transcoding.
///
/// Transient: built per occurrence, transcoded once, never cached across
/// conversions.
#[derive(Debug, Clone)]
pub struct MathExpression {
    /// Math source with delimiters stripped
    pub source: String,

    /// Inline or block display
    pub display_mode: DisplayMode,
}

impl MathExpression {
    /// Create a new expression from delimiter-stripped source.
    pub fn new(source: impl Into<String>, display_mode: DisplayMode) -> Self {
        Self {
            source: source.into(),
            display_mode,
        }
    }
}

/// The outcome of transcoding one math occurrence.
///
/// Exactly one of the three tiers; an unhandled failure is not a variant by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MathRepresentation {
    /// Editable OMML fragment
    Native(String),

    /// Rasterized image of the original source
    FallbackImage {
        /// Encoded image bytes
        #[serde(skip_serializing, default)]
        data: Vec<u8>,
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// Literal source text, rendered monospaced
    FallbackText(String),
}

impl MathRepresentation {
    /// Check whether this is the native (editable) representation.
    pub fn is_native(&self) -> bool {
        matches!(self, MathRepresentation::Native(_))
    }
}

/// Transcode math source through the native tier only.
///
/// Exposed for callers that want the OMML fragment or the precise failure;
/// the render path goes through [`transcode`] instead.
pub fn to_omml(source: &str, display_mode: DisplayMode) -> Result<String> {
    let style = match display_mode {
        DisplayMode::Inline => DisplayStyle::Inline,
        DisplayMode::Block => DisplayStyle::Block,
    };
    let mathml = latex_to_mathml(source, style)
        .map_err(|e| Error::Math(format!("LaTeX parse failed: {}", e)))?;
    mathml_to_omml(&mathml, display_mode == DisplayMode::Block)
}

/// Run the full three-tier pipeline for one expression.
///
/// Always returns a representation; failures in the upper tiers degrade to
/// the next one and are logged, never surfaced.
pub fn transcode(
    expr: &MathExpression,
    rasterizer: Option<&dyn MathRasterizer>,
) -> MathRepresentation {
    match to_omml(&expr.source, expr.display_mode) {
        Ok(omml) => return MathRepresentation::Native(omml),
        Err(err) => {
            log::debug!("native transcoding failed for {:?}: {}", expr.source, err);
        }
    }

    if let Some(backend) = rasterizer {
        match backend.rasterize(&expr.source, expr.display_mode) {
            Ok(img) => {
                return MathRepresentation::FallbackImage {
                    data: img.data,
                    width: img.width,
                    height: img.height,
                }
            }
            Err(err) => {
                log::warn!(
                    "{} failed for {:?}, degrading to literal text: {}",
                    backend.name(),
                    expr.source,
                    err
                );
            }
        }
    }

    MathRepresentation::FallbackText(expr.source.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_tier_simple_expression() {
        let expr = MathExpression::new("x^2 + 1", DisplayMode::Inline);
        let repr = transcode(&expr, None);
        assert!(repr.is_native());
    }

    #[test]
    fn test_block_mode_produces_math_para() {
        let omml = to_omml("E = mc^2", DisplayMode::Block).unwrap();
        assert!(omml.starts_with("<m:oMathPara"));
    }

    #[test]
    fn test_unbalanced_source_never_panics() {
        let expr = MathExpression::new(r"\frac{1}{", DisplayMode::Inline);
        let repr = transcode(&expr, None);
        assert!(matches!(repr, MathRepresentation::FallbackText(ref s) if s == r"\frac{1}{"));
    }

    #[test]
    fn test_rasterizer_tier() {
        struct Stub;
        impl MathRasterizer for Stub {
            fn rasterize(&self, _s: &str, _d: DisplayMode) -> crate::Result<RasterizedMath> {
                Ok(RasterizedMath {
                    data: vec![1, 2, 3],
                    width: 40,
                    height: 12,
                })
            }
        }

        let expr = MathExpression::new(r"\frac{1}{", DisplayMode::Block);
        let repr = transcode(&expr, Some(&Stub));
        assert!(matches!(
            repr,
            MathRepresentation::FallbackImage { width: 40, .. }
        ));
    }

    #[test]
    fn test_failing_rasterizer_degrades_to_text() {
        struct Broken;
        impl MathRasterizer for Broken {
            fn rasterize(&self, _s: &str, _d: DisplayMode) -> crate::Result<RasterizedMath> {
                Err(crate::Error::Raster("no backend".to_string()))
            }
        }

        let expr = MathExpression::new(r"\frac{1}{", DisplayMode::Inline);
        let repr = transcode(&expr, Some(&Broken));
        assert!(matches!(repr, MathRepresentation::FallbackText(_)));
    }
}
