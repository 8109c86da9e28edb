//! 8-bit RGB color type
//!
//! [`Rgb`] is the only color representation the reforming pipeline needs:
//! input pixels arrive as 8-bit RGBA, palettes are lists of 8-bit RGB
//! triples, and the serialized palette is a list of 24-bit integers.

use std::fmt;

/// Luma weights (Rec. 709) used by [`Rgb::distance_sq`].
const WEIGHT_R: f32 = 0.2126;
const WEIGHT_G: f32 = 0.7152;
const WEIGHT_B: f32 = 0.0722;

/// A color with 8-bit red, green and blue channels.
///
/// Alpha is never part of an `Rgb`; every stage that looks at colors drops it.
///
/// # Example
///
/// ```
/// use palette_pack::Rgb;
///
/// let orange = Rgb::new(255, 128, 0);
/// assert_eq!(orange.to_u24(), 0xFF8000);
/// assert_eq!(Rgb::from_u24(0xFF8000), orange);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an `Rgb` from the first three bytes of an RGBA pixel.
    #[inline]
    pub fn from_rgba(pixel: &[u8]) -> Self {
        Self::new(pixel[0], pixel[1], pixel[2])
    }

    /// Pack into a 24-bit `0xRRGGBB` integer.
    #[inline]
    pub const fn to_u24(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Unpack from a `0xRRGGBB` integer. Bits above 24 are ignored.
    #[inline]
    pub const fn from_u24(value: u32) -> Self {
        Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Channels as `f32` for error diffusion arithmetic.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Luma-weighted squared Euclidean distance.
    ///
    /// Green differences dominate, blue differences matter least, matching
    /// how strongly each channel contributes to perceived brightness.
    #[inline]
    pub fn distance_sq(self, other: Rgb) -> f32 {
        distance_sq_f32(self.to_f32(), other)
    }
}

/// Distance between a (possibly error-adjusted) working color and a palette
/// color. Shares the weights of [`Rgb::distance_sq`].
#[inline]
pub(crate) fn distance_sq_f32(color: [f32; 3], other: Rgb) -> f32 {
    let dr = color[0] - other.r as f32;
    let dg = color[1] - other.g as f32;
    let db = color[2] - other.b as f32;
    WEIGHT_R * dr * dr + WEIGHT_G * dg * dg + WEIGHT_B * db * db
}

impl fmt::Display for Rgb {
    /// Formats as `#rrggbb`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}
