//! Color quantization: palette selection plus pixel mapping.

use crate::api::ReformError;
use crate::color::PixelBuffer;
use crate::dither::{dither_with_kernel, DitherKernel};
use crate::output::IndexedBuffer;
use crate::palette::{build_histogram, median_cut, QuantPalette};

/// Color counts the quantizer accepts, one per supported depth.
const VALID_COLOR_COUNTS: [usize; 3] = [2, 16, 256];

/// Reduce `buffer` to at most `color_count` colors.
///
/// Palette selection:
/// - `fixed_palette` if given (must have `1..=color_count` entries)
/// - `[black, white]` when `color_count == 2`
/// - otherwise the image's distinct colors if they fit, or a weighted median
///   cut of its histogram
///
/// Pixels are then mapped to the nearest palette entry, either directly or
/// through error diffusion with `dither`. Alpha is ignored throughout.
///
/// # Errors
///
/// - [`ReformError::InvalidColorCount`] if `color_count` is not 2, 16 or 256
/// - [`ReformError::InvalidFixedPalette`] if `fixed_palette` is too large
///
/// # Example
///
/// ```
/// use palette_pack::{quantize, PixelBuffer, Rgb};
///
/// let grey = Rgb::new(90, 90, 90);
/// let image = PixelBuffer::from_rgb(2, 1, &[grey, Rgb::WHITE]).unwrap();
/// let indexed = quantize(&image, 2, None, None).unwrap();
///
/// assert_eq!(indexed.palette().colors(), &[Rgb::BLACK, Rgb::WHITE]);
/// assert_eq!(indexed.indices(), &[0, 1]);
/// ```
pub fn quantize(
    buffer: &PixelBuffer,
    color_count: usize,
    dither: Option<DitherKernel>,
    fixed_palette: Option<&QuantPalette>,
) -> Result<IndexedBuffer, ReformError> {
    if !VALID_COLOR_COUNTS.contains(&color_count) {
        return Err(ReformError::InvalidColorCount(color_count));
    }

    let palette = match fixed_palette {
        Some(fixed) if fixed.len() > color_count => {
            return Err(ReformError::InvalidFixedPalette {
                len: fixed.len(),
                max: color_count,
            });
        }
        Some(fixed) => fixed.clone(),
        None => build_palette(buffer, color_count),
    };

    let indices = match dither {
        Some(kernel) => dither_with_kernel(buffer, &palette, kernel.kernel()),
        None => map_nearest(buffer, &palette),
    };

    Ok(IndexedBuffer::new(
        indices,
        buffer.width(),
        buffer.height(),
        palette,
    ))
}

/// Pick at most `color_count` colors for `buffer`.
fn build_palette(buffer: &PixelBuffer, color_count: usize) -> QuantPalette {
    if color_count == 2 {
        return QuantPalette::black_and_white();
    }
    let histogram = build_histogram(buffer);
    QuantPalette::from_unique(median_cut(histogram, color_count))
}

/// Nearest-color lookup with no error feedback.
fn map_nearest(buffer: &PixelBuffer, palette: &QuantPalette) -> Vec<u8> {
    buffer
        .rgb_pixels()
        .map(|rgb| palette.find_nearest(rgb) as u8)
        .collect()
}
