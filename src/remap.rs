extern crate alloc;
use alloc::vec::Vec;

use crate::buffer::PixelBuffer;
use crate::histogram::{Color, ColorHistogram, rgb_of};

/// Squared Euclidean distance in RGB space.
#[inline]
pub fn distance_sq(a: Color, b: Color) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Index of the palette entry nearest to `color`. Ties go to the lowest index.
///
/// `palette` must not be empty.
pub fn nearest(palette: &[Color], color: Color) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (i, &entry) in palette.iter().enumerate() {
        let d = distance_sq(color, entry);
        if d < best_dist {
            best_dist = d;
            best_idx = i;
            if d == 0 {
                break;
            }
        }
    }
    best_idx
}

/// Replace the RGB of every pixel with its nearest palette color, keeping alpha.
///
/// Each distinct color is resolved once against the palette; pixels then go
/// through that table. Runs of identical pixels skip the table lookup.
pub fn remap_to_palette(
    buffer: &PixelBuffer,
    hist: &ColorHistogram,
    palette: &[Color],
) -> PixelBuffer {
    let mut out = buffer.clone();
    if palette.is_empty() || buffer.is_empty() {
        return out;
    }

    let resolved: Vec<Color> = hist
        .entries()
        .iter()
        .map(|e| palette[nearest(palette, e.color)])
        .collect();

    let mut prev: Option<(Color, Color)> = None;
    for p in out.pixels_mut() {
        let src = rgb_of(*p);
        let mapped = match prev {
            Some((from, to)) if from == src => to,
            _ => {
                let to = match hist.position(src) {
                    Some(slot) => resolved[slot],
                    None => palette[nearest(palette, src)],
                };
                prev = Some((src, to));
                to
            }
        };
        p.r = mapped[0];
        p.g = mapped[1];
        p.b = mapped[2];
    }

    out
}
