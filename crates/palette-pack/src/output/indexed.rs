//! Quantizer output: palette indices plus the palette they refer to.

use crate::color::{PixelBuffer, Rgb};
use crate::palette::QuantPalette;

/// One palette index per pixel, row-major, with dimensions and an owned
/// [`QuantPalette`].
///
/// Rendering back to RGBA with [`to_pixel_buffer`](Self::to_pixel_buffer)
/// yields an image that contains only palette colors, which is what the
/// resampler and packer operate on.
///
/// # Example
///
/// ```
/// use palette_pack::{IndexedBuffer, QuantPalette, Rgb};
///
/// let image = IndexedBuffer::new(vec![0, 1, 1, 0], 2, 2, QuantPalette::black_and_white());
/// let rgba = image.to_pixel_buffer();
///
/// assert_eq!(rgba.rgb_at(1, 0), Rgb::WHITE);
/// assert_eq!(rgba.as_bytes()[3], 255);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBuffer {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: QuantPalette,
}

impl IndexedBuffer {
    /// Wrap quantizer output.
    ///
    /// Debug-asserts that `indices.len() == width * height` and that every
    /// index is inside the palette.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: QuantPalette) -> Self {
        debug_assert_eq!(indices.len(), width * height);
        debug_assert!(indices.iter().all(|&i| (i as usize) < palette.len()));
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
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
    pub fn palette(&self) -> &QuantPalette {
        &self.palette
    }

    /// Palette color at `(x, y)`.
    pub fn color_at(&self, x: usize, y: usize) -> Rgb {
        self.palette.color(self.indices[y * self.width + x] as usize)
    }

    /// Render to an opaque RGBA buffer of the same dimensions.
    pub fn to_pixel_buffer(&self) -> PixelBuffer {
        let mut data = Vec::with_capacity(self.indices.len() * 4);
        for &i in &self.indices {
            let c = self.palette.color(i as usize);
            data.extend_from_slice(&[c.r, c.g, c.b, 255]);
        }
        PixelBuffer::from_parts(self.width, self.height, data)
    }
}
