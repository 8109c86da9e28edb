//! Nearest-neighbor image resizing.
//!
//! Output pixel `(x, y)` copies source pixel
//! `(floor(x * src_w / dst_w), floor(y * src_h / dst_h))`. No filtering, so a
//! resized palette image contains only colors that were already present.

use crate::api::ReformError;
use crate::color::PixelBuffer;

const BPP: usize = 4;

/// Resize `buffer` to exactly `new_width` x `new_height`.
///
/// Source coordinates are computed in integer arithmetic, so results are
/// identical on every platform. Resizing to the source dimensions returns a
/// pixel-identical copy.
///
/// # Errors
///
/// [`ReformError::InvalidDimensions`] if either target dimension is zero.
///
/// # Example
///
/// ```
/// use palette_pack::{resize_nearest, PixelBuffer, Rgb};
///
/// let source = PixelBuffer::from_rgb(2, 1, &[Rgb::BLACK, Rgb::WHITE]).unwrap();
/// let wide = resize_nearest(&source, 4, 1).unwrap();
///
/// let row: Vec<Rgb> = wide.rgb_pixels().collect();
/// assert_eq!(row, vec![Rgb::BLACK, Rgb::BLACK, Rgb::WHITE, Rgb::WHITE]);
/// ```
pub fn resize_nearest(
    buffer: &PixelBuffer,
    new_width: usize,
    new_height: usize,
) -> Result<PixelBuffer, ReformError> {
    if new_width == 0 || new_height == 0 {
        return Err(ReformError::InvalidDimensions {
            width: new_width,
            height: new_height,
        });
    }

    let (width, height) = (buffer.width(), buffer.height());
    if width == new_width && height == new_height {
        return Ok(buffer.clone());
    }

    let src = buffer.as_bytes();
    let mut out = Vec::with_capacity(new_width * new_height * BPP);

    // Column lookup is the same for every row
    let src_cols: Vec<usize> = (0..new_width).map(|x| x * width / new_width).collect();

    for y in 0..new_height {
        let sy = y * height / new_height;
        let row = &src[sy * width * BPP..(sy + 1) * width * BPP];
        for &sx in &src_cols {
            out.extend_from_slice(&row[sx * BPP..(sx + 1) * BPP]);
        }
    }

    PixelBuffer::new(new_width, new_height, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let pixels: Vec<Rgb> = (0..width * height)
            .map(|i| Rgb::new(i as u8, (i * 3) as u8, (i * 7) as u8))
            .collect();
        PixelBuffer::from_rgb(width, height, &pixels).unwrap()
    }

    #[test]
    fn test_resize_identity() {
        let input = gradient(7, 5);
        let output = resize_nearest(&input, 7, 5).unwrap();
        assert_eq!(output, input, "Same-size resize should be pixel-identical");
    }

    #[test]
    fn test_resize_rejects_zero() {
        let input = gradient(4, 4);
        assert_eq!(
            resize_nearest(&input, 0, 4),
            Err(ReformError::InvalidDimensions {
                width: 0,
                height: 4
            })
        );
        assert!(resize_nearest(&input, 4, 0).is_err());
    }

    #[test]
    fn test_downscale_picks_floor_coordinates() {
        let input = gradient(4, 4);
        let output = resize_nearest(&input, 2, 2).unwrap();

        // (x, y) -> (2x, 2y)
        assert_eq!(output.rgb_at(0, 0), input.rgb_at(0, 0));
        assert_eq!(output.rgb_at(1, 0), input.rgb_at(2, 0));
        assert_eq!(output.rgb_at(0, 1), input.rgb_at(0, 2));
        assert_eq!(output.rgb_at(1, 1), input.rgb_at(2, 2));
    }

    #[test]
    fn test_upscale_duplicates_pixels() {
        let input = gradient(2, 2);
        let output = resize_nearest(&input, 4, 6).unwrap();

        assert_eq!(output.width(), 4);
        assert_eq!(output.height(), 6);
        for y in 0..6 {
            for x in 0..4 {
                assert_eq!(
                    output.rgb_at(x, y),
                    input.rgb_at(x * 2 / 4, y * 2 / 6),
                    "pixel ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn test_non_integer_ratio() {
        // 3 -> 2 columns: x=0 -> 0, x=1 -> floor(3/2) = 1
        let input = gradient(3, 1);
        let output = resize_nearest(&input, 2, 1).unwrap();
        assert_eq!(output.rgb_at(0, 0), input.rgb_at(0, 0));
        assert_eq!(output.rgb_at(1, 0), input.rgb_at(1, 0));
    }

    #[test]
    fn test_alpha_is_carried() {
        let input = PixelBuffer::new(1, 1, vec![9, 8, 7, 42]).unwrap();
        let output = resize_nearest(&input, 2, 2).unwrap();
        assert_eq!(output.as_bytes(), &[9, 8, 7, 42].repeat(4)[..]);
    }
}
