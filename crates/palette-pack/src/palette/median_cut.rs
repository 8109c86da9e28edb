//! Weighted median cut over an exact RGB histogram.

use std::cmp::Ordering;

use crate::color::Rgb;

/// A box of histogram entries awaiting subdivision.
#[derive(Debug, Clone)]
struct ColorBox {
    entries: Vec<(Rgb, u32)>,
}

impl ColorBox {
    fn new(entries: Vec<(Rgb, u32)>) -> Self {
        Self { entries }
    }

    fn pixel_count(&self) -> u64 {
        self.entries.iter().map(|&(_, n)| n as u64).sum()
    }

    /// Per-channel (max - min).
    fn ranges(&self) -> [u8; 3] {
        let mut min = [u8::MAX; 3];
        let mut max = [u8::MIN; 3];
        for (c, _) in &self.entries {
            for (i, v) in [c.r, c.g, c.b].into_iter().enumerate() {
                min[i] = min[i].min(v);
                max[i] = max[i].max(v);
            }
        }
        [max[0] - min[0], max[1] - min[1], max[2] - min[2]]
    }

    /// Channel with the widest range; ties prefer green, then red, then blue.
    fn split_axis(&self) -> usize {
        let [r, g, b] = self.ranges();
        if g >= r && g >= b {
            1
        } else if r >= b {
            0
        } else {
            2
        }
    }

    /// Busy boxes with a wide spread are split first.
    fn priority(&self) -> u64 {
        let [r, g, b] = self.ranges();
        self.pixel_count() * r.max(g).max(b) as u64
    }

    /// Frequency-weighted mean color, rounded to the nearest integer.
    fn centroid(&self) -> Rgb {
        let mut sums = [0u64; 3];
        let mut total = 0u64;
        for &(c, n) in &self.entries {
            let n = n as u64;
            sums[0] += c.r as u64 * n;
            sums[1] += c.g as u64 * n;
            sums[2] += c.b as u64 * n;
            total += n;
        }
        if total == 0 {
            return Rgb::BLACK;
        }
        let avg = |s: u64| ((s + total / 2) / total) as u8;
        Rgb::new(avg(sums[0]), avg(sums[1]), avg(sums[2]))
    }

    /// Split at the weighted median along the widest axis.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let axis = self.split_axis();
        let channel = |c: &Rgb| match axis {
            0 => c.r,
            1 => c.g,
            _ => c.b,
        };

        // Full key as tie-breaker keeps the order total
        self.entries.sort_unstable_by(|(a, _), (b, _)| {
            channel(a)
                .cmp(&channel(b))
                .then_with(|| a.to_u24().cmp(&b.to_u24()))
        });

        let half = self.pixel_count().div_ceil(2);
        let mut accumulated = 0u64;
        let mut split_idx = 1;
        for (i, &(_, n)) in self.entries.iter().enumerate() {
            accumulated += n as u64;
            if accumulated >= half {
                split_idx = i + 1;
                break;
            }
        }
        // At least one entry per side
        split_idx = split_idx.clamp(1, self.entries.len() - 1);

        let right = self.entries.split_off(split_idx);
        (ColorBox::new(self.entries), ColorBox::new(right))
    }
}

/// Reduce `histogram` to at most `max_colors` representative colors.
///
/// If the histogram already fits, its colors are returned unchanged (in
/// histogram order). Otherwise the highest-priority splittable box is split
/// until there are `max_colors` boxes, and each box yields its weighted
/// centroid. Centroids of distinct boxes may round to the same color; the
/// later duplicate is dropped, so the result can be shorter than
/// `max_colors`.
pub(crate) fn median_cut(histogram: Vec<(Rgb, u32)>, max_colors: usize) -> Vec<Rgb> {
    if histogram.len() <= max_colors {
        return histogram.into_iter().map(|(c, _)| c).collect();
    }

    let mut boxes = Vec::with_capacity(max_colors);
    boxes.push(ColorBox::new(histogram));

    while boxes.len() < max_colors {
        // max_by returns the last maximum; compare indices too so the
        // earliest box wins ties
        let best = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.entries.len() >= 2)
            .max_by(|(ia, a), (ib, b)| match a.priority().cmp(&b.priority()) {
                Ordering::Equal => ib.cmp(ia),
                other => other,
            })
            .map(|(i, _)| i);

        let Some(idx) = best else {
            break;
        };

        let (left, right) = boxes.remove(idx).split();
        boxes.insert(idx, right);
        boxes.insert(idx, left);
    }

    let mut palette: Vec<Rgb> = Vec::with_capacity(boxes.len());
    for color in boxes.iter().map(ColorBox::centroid) {
        if !palette.contains(&color) {
            palette.push(color);
        }
    }
    palette
}
