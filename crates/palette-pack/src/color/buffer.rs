//! Owned RGBA8 pixel buffer.

use super::rgb::Rgb;
use crate::api::ReformError;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A row-major, top-to-bottom RGBA8 image.
///
/// Every pipeline stage borrows its input buffer and returns a new owned
/// one; nothing mutates a buffer it did not create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// - [`ReformError::InvalidDimensions`] if either dimension is zero
    /// - [`ReformError::BufferSizeMismatch`] if `data.len() != width * height * 4`
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ReformError> {
        if width == 0 || height == 0 {
            return Err(ReformError::InvalidDimensions { width, height });
        }
        let expected = width * height * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(ReformError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build an opaque buffer from RGB colors in raster order.
    ///
    /// # Errors
    ///
    /// Same as [`PixelBuffer::new`].
    pub fn from_rgb(width: usize, height: usize, pixels: &[Rgb]) -> Result<Self, ReformError> {
        let mut data = Vec::with_capacity(pixels.len() * BYTES_PER_PIXEL);
        for p in pixels {
            data.extend_from_slice(&[p.r, p.g, p.b, 255]);
        }
        Self::new(width, height, data)
    }

    /// Wrap bytes whose length is already known to match.
    pub(crate) fn from_parts(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * BYTES_PER_PIXEL);
        Self {
            width,
            height,
            data,
        }
    }

    /// An opaque buffer of a single color.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        assert!(width > 0 && height > 0, "PixelBuffer dimensions must be non-zero");
        let data = [color.r, color.g, color.b, 255].repeat(width * height);
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Always `false`: zero-sized buffers are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// The RGBA bytes of the pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let offset = (y * self.width + x) * BYTES_PER_PIXEL;
        &self.data[offset..offset + BYTES_PER_PIXEL]
    }

    /// The RGB color at `(x, y)`, alpha dropped.
    #[inline]
    pub fn rgb_at(&self, x: usize, y: usize) -> Rgb {
        Rgb::from_rgba(self.pixel(x, y))
    }

    /// All pixels as RGB in raster order.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data.chunks_exact(BYTES_PER_PIXEL).map(Rgb::from_rgba)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_length() {
        let err = PixelBuffer::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            ReformError::BufferSizeMismatch {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_new_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 3, Vec::new()),
            Err(ReformError::InvalidDimensions { width: 0, height: 3 })
        ));
    }

    #[test]
    fn test_from_rgb_is_opaque_and_ordered() {
        let pixels = [Rgb::new(1, 2, 3), Rgb::new(4, 5, 6)];
        let buffer = PixelBuffer::from_rgb(2, 1, &pixels).unwrap();
        assert_eq!(buffer.as_bytes(), &[1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(buffer.rgb_at(1, 0), Rgb::new(4, 5, 6));
    }

    #[test]
    fn test_rgb_pixels_raster_order() {
        let pixels = [
            Rgb::new(1, 0, 0),
            Rgb::new(2, 0, 0),
            Rgb::new(3, 0, 0),
            Rgb::new(4, 0, 0),
        ];
        let buffer = PixelBuffer::from_rgb(2, 2, &pixels).unwrap();
        let collected: Vec<Rgb> = buffer.rgb_pixels().collect();
        assert_eq!(collected, pixels);
        assert_eq!(buffer.rgb_at(0, 1), Rgb::new(3, 0, 0));
    }

    #[test]
    fn test_filled() {
        let buffer = PixelBuffer::filled(3, 2, Rgb::WHITE);
        assert_eq!(buffer.len(), 6);
        assert!(buffer.rgb_pixels().all(|p| p == Rgb::WHITE));
    }
}
