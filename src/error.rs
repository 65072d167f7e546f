//! Error types for the mdocx library.

use thiserror::Error;

/// Result type alias for mdocx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
///
/// Only a wholly invalid request is rejected outright; formatting and math
/// problems inside a document degrade gracefully and never surface here.
#[derive(Error, Debug)]
pub enum Error {
    /// The input markup is empty or contains only whitespace.
    #[error("input markup is empty")]
    EmptyInput,

    /// An image value could not be decoded from its inline encoding.
    #[error("image decoding error: {0}")]
    ImageDecode(String),

    /// Math source could not be transcoded to native markup.
    ///
    /// Absorbed by the fallback tiers on the render path; only returned by
    /// direct transcoder invocations.
    #[error("math transcoding error: {0}")]
    Math(String),

    /// A rasterizer backend reported a failure.
    ///
    /// The render path absorbs this into the literal-text fallback; it is
    /// only returned by direct rasterizer invocations.
    #[error("rasterization error: {0}")]
    Raster(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<base64::DecodeError> for Error {
    fn from(err: base64::DecodeError) -> Self {
        Error::ImageDecode(err.to_string())
    }
}
