extern crate alloc;
use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use rgb::RGBA8;

/// An opaque RGB color. Alpha is carried separately by the pixel buffer.
pub type Color = [u8; 3];

/// Pack an RGB color into a `u32` map key.
#[inline]
pub(crate) fn color_key(c: Color) -> u32 {
    (c[0] as u32) << 16 | (c[1] as u32) << 8 | c[2] as u32
}

#[inline]
pub(crate) fn rgb_of(p: RGBA8) -> Color {
    [p.r, p.g, p.b]
}

/// A distinct color and the number of pixels that use it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistEntry {
    pub color: Color,
    pub count: u32,
}

/// Distinct RGB colors of an image, in the order they were first seen.
///
/// First-seen order matters: k-means seeds its centroids from the front of
/// this list, and median-cut starts from it before any sort.
#[derive(Debug, Clone, Default)]
pub struct ColorHistogram {
    entries: Vec<HistEntry>,
    index: BTreeMap<u32, usize>,
}

impl ColorHistogram {
    /// Scan RGBA pixels row-major and count distinct RGB values.
    pub fn from_pixels(pixels: &[RGBA8]) -> Self {
        let mut hist = Self::default();
        for &p in pixels {
            hist.add(rgb_of(p));
        }
        hist
    }

    fn add(&mut self, color: Color) {
        let next = self.entries.len();
        let slot = *self.index.entry(color_key(color)).or_insert(next);
        if slot == next {
            self.entries.push(HistEntry { color, count: 1 });
        } else {
            self.entries[slot].count += 1;
        }
    }

    pub fn entries(&self) -> &[HistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `color` in first-seen order.
    pub fn position(&self, color: Color) -> Option<usize> {
        self.index.get(&color_key(color)).copied()
    }

    /// Distinct colors without their counts.
    pub fn colors(&self) -> Vec<Color> {
        self.entries.iter().map(|e| e.color).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn single_color_one_entry() {
        let pixels = vec![RGBA8::new(128, 128, 128, 255); 100];
        let hist = ColorHistogram::from_pixels(&pixels);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist.entries()[0].count, 100);
    }

    #[test]
    fn alpha_does_not_split_colors() {
        let pixels = vec![RGBA8::new(1, 2, 3, 0), RGBA8::new(1, 2, 3, 255)];
        let hist = ColorHistogram::from_pixels(&pixels);
        assert_eq!(hist.len(), 1);
        assert_eq!(hist.entries()[0].count, 2);
    }

    #[test]
    fn keeps_first_seen_order() {
        let pixels = vec![
            RGBA8::new(255, 255, 255, 255),
            RGBA8::new(0, 0, 0, 255),
            RGBA8::new(255, 255, 255, 255),
            RGBA8::new(9, 9, 9, 255),
        ];
        let hist = ColorHistogram::from_pixels(&pixels);
        assert_eq!(
            hist.colors(),
            vec![[255, 255, 255], [0, 0, 0], [9, 9, 9]]
        );
        assert_eq!(hist.entries()[0].count, 2);
        assert_eq!(hist.position([9, 9, 9]), Some(2));
        assert_eq!(hist.position([1, 1, 1]), None);
    }
}
