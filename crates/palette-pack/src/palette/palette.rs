//! Quantizer palette with nearest-color matching.

use std::collections::HashSet;

use crate::api::ReformError;
use crate::color::{distance_sq_f32, Rgb};

/// Largest palette any supported depth can address.
const MAX_COLORS: usize = 256;

/// The ordered color list produced (or supplied) for quantization.
///
/// Entries are unique and there is at least one of them. This is *not* the
/// palette that ends up in the generated source: after resizing, the packer
/// rebuilds an [`OutputPalette`](crate::OutputPalette) in first-occurrence
/// order.
///
/// # Example
///
/// ```
/// use palette_pack::{QuantPalette, Rgb};
///
/// let palette = QuantPalette::new(vec![Rgb::BLACK, Rgb::WHITE]).unwrap();
/// assert_eq!(palette.find_nearest(Rgb::new(200, 200, 200)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantPalette {
    colors: Vec<Rgb>,
}

impl QuantPalette {
    /// Build a palette from `colors`, dropping later duplicates.
    ///
    /// # Errors
    ///
    /// [`ReformError::InvalidFixedPalette`] if no colors remain or more than
    /// 256 distinct colors are given.
    pub fn new(colors: Vec<Rgb>) -> Result<Self, ReformError> {
        let mut seen = HashSet::with_capacity(colors.len());
        let colors: Vec<Rgb> = colors.into_iter().filter(|c| seen.insert(*c)).collect();

        if colors.is_empty() || colors.len() > MAX_COLORS {
            return Err(ReformError::InvalidFixedPalette {
                len: colors.len(),
                max: MAX_COLORS,
            });
        }
        Ok(Self { colors })
    }

    /// The fixed `[black, white]` palette used for 1bpp output.
    pub fn black_and_white() -> Self {
        Self {
            colors: vec![Rgb::BLACK, Rgb::WHITE],
        }
    }

    /// Wrap colors already known to be unique and non-empty.
    pub(crate) fn from_unique(colors: Vec<Rgb>) -> Self {
        debug_assert!(!colors.is_empty());
        Self { colors }
    }

    #[inline]
    pub fn color(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Index of the closest entry; ties go to the lowest index.
    #[inline]
    pub fn find_nearest(&self, color: Rgb) -> usize {
        self.find_nearest_f32(color.to_f32())
    }

    /// [`find_nearest`](Self::find_nearest) for an error-adjusted working
    /// color.
    pub(crate) fn find_nearest_f32(&self, color: [f32; 3]) -> usize {
        let mut best_idx = 0;
        let mut best_dist = f32::INFINITY;
        for (i, &entry) in self.colors.iter().enumerate() {
            let dist = distance_sq_f32(color, entry);
            // Strict comparison keeps the first of equal candidates
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }
        best_idx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_drops_duplicates_keeping_first() {
        let red = Rgb::new(255, 0, 0);
        let palette = QuantPalette::new(vec![red, Rgb::BLACK, red]).unwrap();
        assert_eq!(palette.colors(), &[red, Rgb::BLACK]);
    }

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(
            QuantPalette::new(Vec::new()),
            Err(ReformError::InvalidFixedPalette { len: 0, max: 256 })
        );
    }

    #[test]
    fn test_new_rejects_oversized() {
        let colors: Vec<Rgb> = (0..300u32).map(Rgb::from_u24).collect();
        assert!(matches!(
            QuantPalette::new(colors),
            Err(ReformError::InvalidFixedPalette { len: 300, .. })
        ));
    }

    #[test]
    fn test_black_and_white() {
        let palette = QuantPalette::black_and_white();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.find_nearest(Rgb::new(10, 10, 10)), 0);
        assert_eq!(palette.find_nearest(Rgb::new(240, 240, 240)), 1);
    }

    #[test]
    fn test_green_outweighs_blue() {
        // Same Euclidean distance, but the green error is weighted ~10x
        let palette =
            QuantPalette::new(vec![Rgb::new(100, 150, 100), Rgb::new(100, 100, 150)]).unwrap();
        assert_eq!(palette.find_nearest(Rgb::new(100, 100, 100)), 1);
    }

    #[test]
    fn test_tie_resolves_to_lowest_index() {
        let palette =
            QuantPalette::new(vec![Rgb::new(0, 0, 0), Rgb::new(20, 20, 20)]).unwrap();
        assert_eq!(palette.find_nearest(Rgb::new(10, 10, 10)), 0);
    }
}
