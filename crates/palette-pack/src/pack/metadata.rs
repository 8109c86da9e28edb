//! The contract object between packing and serialization.

use serde::Serialize;

use super::depth::ColorDepth;
use super::packer::{pack_indexed, unpack_indices, OutputPalette};
use crate::api::ReformError;
use crate::color::PixelBuffer;

/// Everything the serializer needs to emit an image.
///
/// Invariants (upheld by [`ImageMetadata::from_buffer`]):
/// - `palette.len() == depth.color_count()`
/// - every packed index is `< palette.len()`
/// - `pixels.len() == depth.packed_len(width * height)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    palette: OutputPalette,
    pixels: Vec<u8>,
    width: usize,
    height: usize,
    depth: ColorDepth,
}

impl ImageMetadata {
    /// Index and pack a (resized) buffer.
    ///
    /// # Errors
    ///
    /// [`ReformError::PaletteOverflow`] if the buffer has more distinct
    /// colors than `depth` can address.
    pub fn from_buffer(buffer: &PixelBuffer, depth: ColorDepth) -> Result<Self, ReformError> {
        let (palette, pixels) = pack_indexed(buffer, depth)?;
        Ok(Self {
            palette,
            pixels,
            width: buffer.width(),
            height: buffer.height(),
            depth,
        })
    }

    #[inline]
    pub fn palette(&self) -> &OutputPalette {
        &self.palette
    }

    /// Packed pixel bytes.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// Palette indices in raster order, unpacked from [`pixels`](Self::pixels).
    pub fn indices(&self) -> Vec<u8> {
        unpack_indices(&self.pixels, self.depth, self.width * self.height)
    }
}
