//! Unified error type for the palette-pack public API.
//!
//! Every variant is a caller or configuration error: the pipeline is pure,
//! so there is nothing to retry. A failed call never yields partial output.

use thiserror::Error;

/// Error returned by every fallible palette-pack operation.
///
/// # Example
///
/// ```
/// use palette_pack::{ColorDepth, ReformError};
///
/// fn parse(bits: u8) -> Result<ColorDepth, ReformError> {
///     ColorDepth::from_bits(bits)
/// }
///
/// assert!(parse(4).is_ok());
/// assert_eq!(parse(3), Err(ReformError::InvalidDepth(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReformError {
    /// Bit depth outside {1, 4, 8}.
    #[error("invalid color depth {0} (expected 1, 4 or 8)")]
    InvalidDepth(u8),

    /// Quantizer color count outside {2, 16, 256}.
    #[error("invalid color count {0} (expected 2, 16 or 256)")]
    InvalidColorCount(usize),

    /// A zero width or height.
    #[error("invalid dimensions {width}x{height} (both must be at least 1)")]
    InvalidDimensions { width: usize, height: usize },

    /// Raw pixel data does not match the declared dimensions.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Dither kernel name not in the supported set.
    #[error("unknown dither kernel: {0}")]
    UnknownDitherKernel(String),

    /// Bracket style name not in the supported set.
    #[error("unknown bracket style: {0}")]
    UnknownBracketStyle(String),

    /// More distinct colors than the depth can index.
    #[error("image has {colors} distinct colors but {depth}bpp can index at most {max}")]
    PaletteOverflow { colors: usize, depth: u8, max: usize },

    /// A supplied fixed palette was empty or larger than the color count.
    #[error("fixed palette has {len} colors, expected 1..={max}")]
    InvalidFixedPalette { len: usize, max: usize },
}
