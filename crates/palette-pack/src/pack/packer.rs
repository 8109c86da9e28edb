//! Raster-scan indexing and sub-byte packing.
//!
//! The packer ignores whatever palette produced the image. It walks the
//! pixels once, gives every new 24-bit color the next free slot
//! (first-occurrence order), and packs the slot numbers MSB-first.

use serde::Serialize;
use std::collections::HashMap;

use super::depth::ColorDepth;
use crate::api::ReformError;
use crate::color::PixelBuffer;

/// Palette rebuilt by the packer: 24-bit `0xRRGGBB` values in
/// first-occurrence order, zero-padded to `2^depth` entries.
///
/// Deliberately a different type from [`QuantPalette`](crate::QuantPalette):
/// its ordering comes from the resized image, not from the quantizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OutputPalette(Vec<u32>);

impl OutputPalette {
    /// Wrap already-padded entries.
    ///
    /// # Errors
    ///
    /// [`ReformError::PaletteOverflow`] if `entries` is longer than
    /// `depth.color_count()`. Shorter lists are zero-padded.
    pub fn new(mut entries: Vec<u32>, depth: ColorDepth) -> Result<Self, ReformError> {
        let max = depth.color_count();
        if entries.len() > max {
            return Err(ReformError::PaletteOverflow {
                colors: entries.len(),
                depth: depth.bits(),
                max,
            });
        }
        entries.resize(max, 0);
        Ok(Self(entries))
    }

    #[inline]
    pub fn entries(&self) -> &[u32] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<u32> {
        self.0
    }
}

/// Index every pixel of `buffer` against a first-occurrence palette and
/// pack the indices at `depth`.
///
/// Returns the zero-padded [`OutputPalette`] and the packed bytes
/// (`ceil(width * height * bits / 8)` of them).
///
/// # Errors
///
/// [`ReformError::PaletteOverflow`] if the buffer holds more than
/// `2^depth` distinct colors.
///
/// # Example
///
/// ```
/// use palette_pack::{pack_indexed, ColorDepth, PixelBuffer, Rgb};
///
/// let red = Rgb::new(255, 0, 0);
/// let blue = Rgb::new(0, 0, 255);
/// let buffer = PixelBuffer::from_rgb(4, 1, &[red, blue, blue, red]).unwrap();
///
/// let (palette, packed) = pack_indexed(&buffer, ColorDepth::Four).unwrap();
/// assert_eq!(&palette.entries()[..3], &[0xFF0000, 0x0000FF, 0]);
/// assert_eq!(packed, vec![0x01, 0x10]);
/// ```
pub fn pack_indexed(
    buffer: &PixelBuffer,
    depth: ColorDepth,
) -> Result<(OutputPalette, Vec<u8>), ReformError> {
    let max = depth.color_count();
    let mut colors: Vec<u32> = Vec::new();
    let mut slots: HashMap<u32, u8> = HashMap::new();
    let mut indices = Vec::with_capacity(buffer.len());

    for rgb in buffer.rgb_pixels() {
        let key = rgb.to_u24();
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                if colors.len() == max {
                    return Err(ReformError::PaletteOverflow {
                        colors: count_distinct(buffer),
                        depth: depth.bits(),
                        max,
                    });
                }
                let slot = colors.len() as u8;
                colors.push(key);
                slots.insert(key, slot);
                slot
            }
        };
        indices.push(slot);
    }

    let palette = OutputPalette::new(colors, depth)?;
    Ok((palette, pack_indices(&indices, depth)))
}

fn count_distinct(buffer: &PixelBuffer) -> usize {
    let mut seen: Vec<u32> = buffer.rgb_pixels().map(|c| c.to_u24()).collect();
    seen.sort_unstable();
    seen.dedup();
    seen.len()
}

/// Pack palette indices MSB-first, continuously across rows.
///
/// A pixel whose position is a multiple of `8 / bits` starts a new byte
/// with its index in the top bits; the following pixels are OR-ed into that
/// byte at decreasing shifts. A trailing partial byte keeps zeros in the
/// bits that were never written. Indices wider than `bits` are masked.
pub fn pack_indices(indices: &[u8], depth: ColorDepth) -> Vec<u8> {
    let bits = depth.bits();
    let per_byte = depth.pixels_per_byte();
    let mask = if bits == 8 { 0xFF } else { (1u8 << bits) - 1 };
    let mut packed = Vec::with_capacity(depth.packed_len(indices.len()));

    for (i, &idx) in indices.iter().enumerate() {
        let slot = i % per_byte;
        let shift = 8 - bits as usize * (slot + 1);
        let value = (idx & mask) << shift;
        if slot == 0 {
            packed.push(value);
        } else if let Some(last) = packed.last_mut() {
            *last |= value;
        }
    }

    packed
}

/// Inverse of [`pack_indices`]: read `count` indices back out of `packed`.
///
/// Reading stops early if `packed` is too short.
pub fn unpack_indices(packed: &[u8], depth: ColorDepth, count: usize) -> Vec<u8> {
    let bits = depth.bits() as usize;
    let per_byte = depth.pixels_per_byte();
    let mask = if bits == 8 { 0xFF } else { (1u8 << bits) - 1 };

    (0..count)
        .map_while(|i| {
            let byte = *packed.get(i / per_byte)?;
            let shift = 8 - bits * (i % per_byte + 1);
            Some((byte >> shift) & mask)
        })
        .collect()
}
