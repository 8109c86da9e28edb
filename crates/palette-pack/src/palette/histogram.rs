//! Exact color frequency histogram.

use std::collections::BTreeMap;

use crate::color::{PixelBuffer, Rgb};

/// Count every distinct RGB color (alpha ignored).
///
/// Returned in ascending `0xRRGGBB` order so downstream clustering never
/// depends on hash iteration order.
pub(crate) fn build_histogram(buffer: &PixelBuffer) -> Vec<(Rgb, u32)> {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    for rgb in buffer.rgb_pixels() {
        *counts.entry(rgb.to_u24()).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(key, count)| (Rgb::from_u24(key), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_order() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        let buffer = PixelBuffer::from_rgb(3, 1, &[red, blue, red]).unwrap();

        assert_eq!(build_histogram(&buffer), vec![(blue, 1), (red, 2)]);
    }

    #[test]
    fn test_alpha_does_not_split_buckets() {
        let buffer = PixelBuffer::new(2, 1, vec![5, 5, 5, 255, 5, 5, 5, 10]).unwrap();
        assert_eq!(build_histogram(&buffer), vec![(Rgb::new(5, 5, 5), 2)]);
    }
}
