//! Reformer builder -- the primary entry point for the crate.
//!
//! [`Reformer`] validates the output format once and then runs the complete
//! quantize, resize and pack pipeline for any number of images.

use super::error::ReformError;
use crate::color::PixelBuffer;
use crate::dither::DitherKernel;
use crate::pack::{ColorDepth, ImageMetadata};
use crate::palette::QuantPalette;
use crate::quantize::quantize;
use crate::resample::resize_nearest;
use crate::serialize::{render_source, BracketStyle};

/// Converts RGBA images into packed, fixed-palette [`ImageMetadata`].
///
/// # Design
///
/// - [`Reformer::new`] rejects an invalid target size before any pixel work
/// - Configuration methods consume and return `self`
/// - [`reform()`](Self::reform) takes `&self`, so one `Reformer` can be
///   reused across images and threads
///
/// # Example
///
/// ```
/// use palette_pack::{BracketStyle, ColorDepth, DitherKernel, PixelBuffer, Reformer, Rgb};
///
/// let reformer = Reformer::new(ColorDepth::Four, 2, 2)
///     .unwrap()
///     .dither(Some(DitherKernel::FloydSteinberg));
///
/// let image = PixelBuffer::filled(4, 4, Rgb::new(10, 120, 200));
/// let reformed = reformer.reform(&image).unwrap();
///
/// assert_eq!(reformed.metadata().width(), 2);
/// assert_eq!(reformed.metadata().palette().len(), 16);
///
/// let source = reformed.to_source("icon", BracketStyle::SameLine);
/// assert!(source.contains("icon4BPP_UNCOMP"));
/// ```
#[derive(Debug, Clone)]
pub struct Reformer {
    depth: ColorDepth,
    width: usize,
    height: usize,
    dither: Option<DitherKernel>,
    fixed_palette: Option<QuantPalette>,
}

impl Reformer {
    /// Create a reformer producing `width` x `height` images at `depth`.
    ///
    /// Dithering is off by default.
    ///
    /// # Errors
    ///
    /// [`ReformError::InvalidDimensions`] if either dimension is zero.
    pub fn new(depth: ColorDepth, width: usize, height: usize) -> Result<Self, ReformError> {
        if width == 0 || height == 0 {
            return Err(ReformError::InvalidDimensions { width, height });
        }
        Ok(Self {
            depth,
            width,
            height,
            dither: None,
            fixed_palette: None,
        })
    }

    /// Select an error diffusion kernel, or `None` for nearest-color mapping.
    #[inline]
    pub fn dither(mut self, kernel: Option<DitherKernel>) -> Self {
        self.dither = kernel;
        self
    }

    /// Map onto `palette` instead of deriving one from the image.
    ///
    /// A palette larger than the depth allows makes
    /// [`reform()`](Self::reform) fail with
    /// [`ReformError::InvalidFixedPalette`].
    #[inline]
    pub fn fixed_palette(mut self, palette: QuantPalette) -> Self {
        self.fixed_palette = Some(palette);
        self
    }

    #[inline]
    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// Target `(width, height)`.
    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Run the pipeline on `image`.
    ///
    /// The image is quantized at its source resolution, rendered back to
    /// palette colors, resized, then indexed in first-occurrence order and
    /// packed. The input is not modified.
    ///
    /// # Errors
    ///
    /// [`ReformError::InvalidFixedPalette`] for an oversized fixed palette.
    /// No partial result is produced.
    pub fn reform(&self, image: &PixelBuffer) -> Result<Reformed, ReformError> {
        let indexed = quantize(
            image,
            self.depth.color_count(),
            self.dither,
            self.fixed_palette.as_ref(),
        )?;
        let quantized = indexed.to_pixel_buffer();
        let resized = resize_nearest(&quantized, self.width, self.height)?;
        let metadata = ImageMetadata::from_buffer(&resized, self.depth)?;

        Ok(Reformed { metadata, resized })
    }
}

/// Result of [`Reformer::reform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reformed {
    metadata: ImageMetadata,
    resized: PixelBuffer,
}

impl Reformed {
    #[inline]
    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    /// The quantized, resized RGBA image the metadata was packed from.
    #[inline]
    pub fn resized(&self) -> &PixelBuffer {
        &self.resized
    }

    pub fn into_metadata(self) -> ImageMetadata {
        self.metadata
    }

    /// Shorthand for [`render_source`] on the metadata.
    pub fn to_source(&self, prefix: &str, style: BracketStyle) -> String {
        render_source(&self.metadata, prefix, style)
    }
}
