extern crate alloc;
use alloc::vec::Vec;

use crate::block::mean_round;
use crate::histogram::{Color, ColorHistogram, HistEntry};

/// A bucket of distinct colors for median cut subdivision.
#[derive(Debug, Clone)]
struct ColorBox {
    entries: Vec<HistEntry>,
}

impl ColorBox {
    fn new(entries: Vec<HistEntry>) -> Self {
        Self { entries }
    }

    /// Range (max - min) along each of R, G, B.
    fn ranges(&self) -> [u8; 3] {
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for e in &self.entries {
            for ch in 0..3 {
                lo[ch] = lo[ch].min(e.color[ch]);
                hi[ch] = hi[ch].max(e.color[ch]);
            }
        }
        [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]]
    }

    /// Channel with the widest range and that range. Ties prefer R, then G.
    fn widest(&self) -> (usize, u8) {
        let ranges = self.ranges();
        let mut axis = 0;
        for ch in 1..3 {
            if ranges[ch] > ranges[axis] {
                axis = ch;
            }
        }
        (axis, ranges[axis])
    }

    /// Frequency-weighted mean color.
    fn representative(&self) -> Color {
        let mut sums = [0u64; 3];
        let mut total = 0u64;
        for e in &self.entries {
            let w = e.count as u64;
            sums[0] += e.color[0] as u64 * w;
            sums[1] += e.color[1] as u64 * w;
            sums[2] += e.color[2] as u64 * w;
            total += w;
        }
        if total == 0 {
            return [0, 0, 0];
        }
        [
            mean_round(sums[0], total),
            mean_round(sums[1], total),
            mean_round(sums[2], total),
        ]
    }

    /// Stable-sort along the widest channel and cut at `n / 2`.
    fn split(mut self) -> (ColorBox, ColorBox) {
        let (axis, _) = self.widest();
        self.entries.sort_by_key(|e| e.color[axis]);
        let upper = self.entries.split_off(self.entries.len() / 2);
        (ColorBox::new(self.entries), ColorBox::new(upper))
    }
}

/// Median cut over the distinct colors of `hist`.
///
/// Starts from a single bucket and repeatedly splits the bucket (with at
/// least two colors) whose widest channel range is largest, earliest bucket
/// first on ties. The lower half takes the bucket's place and the upper half
/// goes right after it. Stops at `max_colors` buckets or when every bucket
/// holds a single color. Returns one frequency-weighted mean per bucket.
pub fn median_cut(hist: &ColorHistogram, max_colors: usize) -> Vec<Color> {
    if hist.is_empty() || max_colors == 0 {
        return Vec::new();
    }

    let mut boxes = Vec::with_capacity(max_colors);
    boxes.push(ColorBox::new(hist.entries().to_vec()));

    while boxes.len() < max_colors {
        let mut best: Option<(usize, u8)> = None;
        for (i, b) in boxes.iter().enumerate() {
            if b.entries.len() < 2 {
                continue;
            }
            let (_, range) = b.widest();
            if best.map_or(true, |(_, r)| range > r) {
                best = Some((i, range));
            }
        }

        let Some((idx, _)) = best else {
            break; // No more splittable boxes
        };

        let (lower, upper) = boxes.remove(idx).split();
        boxes.insert(idx, upper);
        boxes.insert(idx, lower);
    }

    log::debug!(
        "median cut: {} distinct colors -> {} buckets",
        hist.len(),
        boxes.len()
    );

    boxes.iter().map(ColorBox::representative).collect()
}
