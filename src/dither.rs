extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::buffer::PixelBuffer;
use crate::histogram::{Color, ColorHistogram};

/// Squared RGB distance between an error-carrying color and a palette entry.
fn distance_sq_f32(a: [f32; 3], b: Color) -> f32 {
    let dr = a[0] - b[0] as f32;
    let dg = a[1] - b[1] as f32;
    let db = a[2] - b[2] as f32;
    dr * dr + dg * dg + db * db
}

fn nearest_f32(palette: &[Color], color: [f32; 3]) -> Color {
    let mut best = palette[0];
    let mut best_dist = f32::MAX;
    for &entry in palette {
        let d = distance_sq_f32(color, entry);
        if d < best_dist {
            best_dist = d;
            best = entry;
        }
    }
    best
}

/// Floyd-Steinberg error diffusion over the block grid.
///
/// `averaged` is the block-averaged image (the exact colors each cell wants)
/// and `quantized` is the same image after palette reduction. The palette is
/// the set of colors present in `quantized`, so every output color is one the
/// quantizer already produced. Each `block_size` cell is treated as a single
/// pixel: cells are visited row-major, the nearest palette color is chosen for
/// the cell's color plus carried error, and the remainder is pushed to
/// neighbors with weights right 7/16, bottom-left 3/16, bottom 5/16,
/// bottom-right 1/16. Alpha comes from `quantized`.
///
/// Both buffers must have the same dimensions and be uniform within each
/// block, which holds for the output of `block_average` and any quantizer.
pub fn dither_blocks(
    averaged: &PixelBuffer,
    quantized: &PixelBuffer,
    block_size: u32,
) -> PixelBuffer {
    let mut out = quantized.clone();
    if quantized.is_empty() || block_size == 0 {
        return out;
    }

    let palette = ColorHistogram::from_pixels(quantized.pixels()).colors();

    let (width, height) = (quantized.width(), quantized.height());
    let size = block_size as usize;
    let cols = width.div_ceil(size);
    let rows = height.div_ceil(size);

    let src = averaged.pixels();
    let mut cells: Vec<[f32; 3]> = Vec::with_capacity(cols * rows);
    for cy in 0..rows {
        for cx in 0..cols {
            let p = src[cy * size * width + cx * size];
            cells.push([p.r as f32, p.g as f32, p.b as f32]);
        }
    }

    let mut chosen = vec![[0u8; 3]; cols * rows];

    let diffuse = |cells: &mut [[f32; 3]], target: usize, err: [f32; 3], fraction: f32| {
        for ch in 0..3 {
            cells[target][ch] += err[ch] * fraction;
        }
    };

    for cy in 0..rows {
        for cx in 0..cols {
            let idx = cy * cols + cx;
            let current = cells[idx];
            let pick = nearest_f32(&palette, current);
            chosen[idx] = pick;

            let err = [
                current[0] - pick[0] as f32,
                current[1] - pick[1] as f32,
                current[2] - pick[2] as f32,
            ];

            if cx + 1 < cols {
                diffuse(&mut cells, idx + 1, err, 7.0 / 16.0);
            }
            if cy + 1 < rows {
                if cx > 0 {
                    diffuse(&mut cells, idx + cols - 1, err, 3.0 / 16.0);
                }
                diffuse(&mut cells, idx + cols, err, 5.0 / 16.0);
                if cx + 1 < cols {
                    diffuse(&mut cells, idx + cols + 1, err, 1.0 / 16.0);
                }
            }
        }
    }

    let dst = out.pixels_mut();
    for y in 0..height {
        let row = &mut dst[y * width..(y + 1) * width];
        for (x, p) in row.iter_mut().enumerate() {
            let c = chosen[(y / size) * cols + x / size];
            p.r = c[0];
            p.g = c[1];
            p.b = c[2];
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::block_average;
    use crate::histogram::rgb_of;
    use crate::posterize::posterize;
    use rgb::RGBA8;

    fn uses_only(buffer: &PixelBuffer, palette: &[Color]) -> bool {
        buffer
            .pixels()
            .iter()
            .all(|&p| palette.contains(&rgb_of(p)))
    }

    fn gray_ramp(width: usize) -> PixelBuffer {
        let pixels: Vec<RGBA8> = (0..width)
            .map(|x| {
                let v = (x * 255 / (width - 1)) as u8;
                RGBA8::new(v, v, v, 200)
            })
            .collect();
        PixelBuffer::from_pixels(width, 1, &pixels).unwrap()
    }

    #[test]
    fn exact_palette_is_untouched() {
        let buf = gray_ramp(8);
        let out = dither_blocks(&buf, &buf, 1);
        assert_eq!(out, buf);
    }

    #[test]
    fn output_stays_in_palette() {
        let averaged = block_average(&gray_ramp(32), 2).unwrap();
        let quantized = posterize(&averaged, 128);
        let palette = ColorHistogram::from_pixels(quantized.pixels()).colors();
        let out = dither_blocks(&averaged, &quantized, 2);
        assert!(uses_only(&out, &palette));
        assert!(out.pixels().iter().all(|p| p.a == 200));
    }

    #[test]
    fn blocks_stay_uniform() {
        let averaged = block_average(&gray_ramp(30), 3).unwrap();
        let quantized = posterize(&averaged, 128);
        let out = dither_blocks(&averaged, &quantized, 3);
        for chunk in out.pixels().chunks(3) {
            assert!(chunk.iter().all(|&p| p == chunk[0]));
        }
    }

    #[test]
    fn dark_gray_mixes_palette_entries() {
        // A flat 40 field against {0, 128}: carried error pushes some cells
        // up to 128 instead of all landing on 0.
        let averaged = PixelBuffer::filled(8, 1, RGBA8::new(40, 40, 40, 255));
        let quantized = PixelBuffer::from_pixels(
            8,
            1,
            &[
                RGBA8::new(0, 0, 0, 255),
                RGBA8::new(128, 128, 128, 255),
                RGBA8::new(128, 128, 128, 255),
                RGBA8::new(128, 128, 128, 255),
                RGBA8::new(128, 128, 128, 255),
                RGBA8::new(128, 128, 128, 255),
                RGBA8::new(128, 128, 128, 255),
                RGBA8::new(128, 128, 128, 255),
            ],
        )
        .unwrap();
        let out = dither_blocks(&averaged, &quantized, 1);
        let dark = out.pixels().iter().filter(|p| p.r == 0).count();
        assert!(dark > 0 && dark < 8, "dark cells: {dark}");
    }
}
