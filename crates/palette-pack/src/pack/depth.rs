//! Output bit depth.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::api::ReformError;

/// Bits per packed palette index.
///
/// Only the three depths the target graphics library understands are
/// representable; everything else is rejected by [`ColorDepth::from_bits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ColorDepth {
    /// 1 bpp, 2 colors, 8 pixels per byte.
    One,
    /// 4 bpp, 16 colors, 2 pixels per byte.
    Four,
    /// 8 bpp, 256 colors, 1 pixel per byte.
    Eight,
}

impl ColorDepth {
    /// Parse a bit count.
    ///
    /// # Errors
    ///
    /// [`ReformError::InvalidDepth`] for anything other than 1, 4 or 8.
    pub fn from_bits(bits: u8) -> Result<Self, ReformError> {
        match bits {
            1 => Ok(ColorDepth::One),
            4 => Ok(ColorDepth::Four),
            8 => Ok(ColorDepth::Eight),
            other => Err(ReformError::InvalidDepth(other)),
        }
    }

    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            ColorDepth::One => 1,
            ColorDepth::Four => 4,
            ColorDepth::Eight => 8,
        }
    }

    /// Palette size, `2^bits`.
    #[inline]
    pub fn color_count(self) -> usize {
        1 << self.bits()
    }

    #[inline]
    pub fn pixels_per_byte(self) -> usize {
        8 / self.bits() as usize
    }

    /// Number of bytes needed to pack `pixels` indices.
    #[inline]
    pub fn packed_len(self, pixels: usize) -> usize {
        pixels.div_ceil(self.pixels_per_byte())
    }
}

impl TryFrom<u8> for ColorDepth {
    type Error = ReformError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::from_bits(bits)
    }
}

impl From<ColorDepth> for u8 {
    fn from(depth: ColorDepth) -> Self {
        depth.bits()
    }
}

impl fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits_accepts_supported() {
        assert_eq!(ColorDepth::from_bits(1), Ok(ColorDepth::One));
        assert_eq!(ColorDepth::from_bits(4), Ok(ColorDepth::Four));
        assert_eq!(ColorDepth::from_bits(8), Ok(ColorDepth::Eight));
    }

    #[test]
    fn test_from_bits_rejects_others() {
        for bits in [0u8, 2, 3, 5, 16, 24] {
            assert_eq!(
                ColorDepth::from_bits(bits),
                Err(ReformError::InvalidDepth(bits))
            );
        }
    }

    #[test]
    fn test_color_counts() {
        assert_eq!(ColorDepth::One.color_count(), 2);
        assert_eq!(ColorDepth::Four.color_count(), 16);
        assert_eq!(ColorDepth::Eight.color_count(), 256);
    }

    #[test]
    fn test_packed_len_rounds_up() {
        assert_eq!(ColorDepth::One.packed_len(9), 2);
        assert_eq!(ColorDepth::Four.packed_len(3), 2);
        assert_eq!(ColorDepth::Eight.packed_len(3), 3);
        assert_eq!(ColorDepth::One.packed_len(8), 1);
    }

    #[test]
    fn test_serde_as_integer() {
        assert_eq!(serde_json::to_string(&ColorDepth::Four).unwrap(), "4");
        let depth: ColorDepth = serde_json::from_str("8").unwrap();
        assert_eq!(depth, ColorDepth::Eight);
        assert!(serde_json::from_str::<ColorDepth>("3").is_err());
    }
}
