//! Image resolution: mapping image identifiers to resident bytes.

use crate::error::Result;
use base64::Engine;
use std::collections::HashMap;
use std::io::Cursor;

/// Read-only mapping from image identifier to raw bytes, supplied by the
/// caller alongside the markup text.
///
/// Values arrive either as named binary attachments (raw bytes) or as
/// inline base64-encoded strings.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    entries: HashMap<String, Vec<u8>>,
}

impl ImageMap {
    /// Create an empty image map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert raw image bytes under an identifier.
    pub fn insert(&mut self, id: impl Into<String>, data: Vec<u8>) {
        self.entries.insert(id.into(), data);
    }

    /// Insert a base64-encoded image value under an identifier.
    pub fn insert_base64(&mut self, id: impl Into<String>, encoded: &str) -> Result<()> {
        let data = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        self.entries.insert(id.into(), data);
        Ok(())
    }

    /// Look up image bytes by identifier.
    pub fn get(&self, id: &str) -> Option<&[u8]> {
        self.entries.get(id).map(|v| v.as_slice())
    }

    /// Check whether an identifier is present.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of images in the map.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an identifier to bytes plus a display size bounded by
    /// `max_width`, preserving aspect ratio.
    ///
    /// Returns `None` when the identifier is unknown or the bytes are not a
    /// decodable image; the renderer skips such references silently.
    pub fn resolve(&self, id: &str, max_width: u32) -> Option<ResolvedImage> {
        let data = self.entries.get(id)?;
        let (width, height) = probe_dimensions(data)?;
        let (width, height) = scaled_to_width(width, height, max_width);
        Some(ResolvedImage {
            data: data.clone(),
            width,
            height,
        })
    }
}

/// An image resolved to bytes and display dimensions.
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    /// Encoded image bytes
    pub data: Vec<u8>,

    /// Display width in pixels
    pub width: u32,

    /// Display height in pixels
    pub height: u32,
}

/// Read intrinsic pixel dimensions from encoded image bytes.
fn probe_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok(dims) => Some(dims),
        Err(err) => {
            log::debug!("image dimension probe failed: {}", err);
            None
        }
    }
}

/// Scale dimensions down to fit `max_width`, preserving aspect ratio.
/// Images narrower than the bound keep their intrinsic size.
fn scaled_to_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let scaled_height =
        ((height as u64 * max_width as u64 + width as u64 / 2) / width as u64) as u32;
    (max_width, scaled_height.max(1))
}
