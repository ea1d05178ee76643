//! Uniform per-channel step quantization.
//!
//! Both the "simple" and "octree" algorithms reduce to snapping each channel
//! down to a multiple of a fixed step; they only differ in how the step is
//! derived from the requested color count.

use crate::buffer::PixelBuffer;

/// Integer square root (floor).
fn isqrt(n: u32) -> u32 {
    if n < 2 {
        return n;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// `floor(256 / sqrt(target_colors))`, computed exactly.
///
/// `floor(256 / sqrt(k)) == floor(sqrt(65536 / k)) == isqrt(65536 / k)` for
/// integer `k`, which avoids float rounding at perfect squares.
pub fn simple_step(target_colors: u32) -> u32 {
    isqrt(65_536 / target_colors.max(1))
}

/// `floor(256 / 2^floor(log2(target_colors) / 3))`.
///
/// Spreads `log2(k)` bits evenly over three channels. The step is uniform per
/// channel; there is no tree.
pub fn octree_step(target_colors: u32) -> u32 {
    let bits = target_colors.max(1).ilog2() / 3;
    256 >> bits
}

/// Snap every RGB channel down to a multiple of `step`. Alpha is untouched.
pub fn posterize(buffer: &PixelBuffer, step: u32) -> PixelBuffer {
    let mut out = buffer.clone();
    let step = step.max(1);
    let snap = |v: u8| ((v as u32 / step) * step) as u8;
    for p in out.pixels_mut() {
        p.r = snap(p.r);
        p.g = snap(p.g);
        p.b = snap(p.b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGBA8;

    #[test]
    fn simple_step_values() {
        assert_eq!(simple_step(1), 256);
        assert_eq!(simple_step(2), 181);
        assert_eq!(simple_step(4), 128);
        assert_eq!(simple_step(8), 90);
        assert_eq!(simple_step(16), 64);
        assert_eq!(simple_step(255), 16);
    }

    #[test]
    fn octree_step_values() {
        assert_eq!(octree_step(1), 256);
        assert_eq!(octree_step(7), 256);
        assert_eq!(octree_step(8), 128);
        assert_eq!(octree_step(63), 128);
        assert_eq!(octree_step(64), 64);
        assert_eq!(octree_step(255), 64);
    }

    #[test]
    fn value_200_with_step_128() {
        let buf = PixelBuffer::filled(1, 1, RGBA8::new(200, 127, 255, 33));
        let out = posterize(&buf, simple_step(4));
        assert_eq!(out.pixel(0, 0), RGBA8::new(128, 0, 128, 33));
    }

    #[test]
    fn step_256_clears_color() {
        let buf = PixelBuffer::filled(2, 2, RGBA8::new(255, 200, 10, 200));
        let out = posterize(&buf, 256);
        assert!(out.pixels().iter().all(|&p| p == RGBA8::new(0, 0, 0, 200)));
    }
}
