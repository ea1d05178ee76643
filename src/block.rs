extern crate alloc;

use crate::buffer::PixelBuffer;
use crate::error::PixelateError;

/// Rounded mean of `sum / count` (round half up, non-negative inputs).
pub(crate) fn mean_round(sum: u64, count: u64) -> u8 {
    ((sum + count / 2) / count) as u8
}

/// Replace every `block_size`×`block_size` block with its average color.
///
/// Blocks start at the top-left corner; blocks on the right and bottom edges
/// are clipped to the image. R, G, B and A are averaged independently with
/// round-half-up. The output has the same dimensions as the input.
pub fn block_average(
    buffer: &PixelBuffer,
    block_size: u32,
) -> Result<PixelBuffer, PixelateError> {
    if block_size == 0 {
        return Err(PixelateError::config("block_size", block_size));
    }

    let mut out = buffer.clone();
    if block_size == 1 || buffer.is_empty() {
        return Ok(out);
    }

    let (width, height) = (buffer.width(), buffer.height());
    let size = block_size as usize;
    let src = buffer.pixels();
    let dst = out.pixels_mut();

    for by in (0..height).step_by(size) {
        let y_end = (by + size).min(height);
        for bx in (0..width).step_by(size) {
            let x_end = (bx + size).min(width);

            let mut sums = [0u64; 4];
            for y in by..y_end {
                for p in &src[y * width + bx..y * width + x_end] {
                    sums[0] += p.r as u64;
                    sums[1] += p.g as u64;
                    sums[2] += p.b as u64;
                    sums[3] += p.a as u64;
                }
            }

            let count = ((y_end - by) * (x_end - bx)) as u64;
            let avg = rgb::RGBA8::new(
                mean_round(sums[0], count),
                mean_round(sums[1], count),
                mean_round(sums[2], count),
                mean_round(sums[3], count),
            );

            for y in by..y_end {
                dst[y * width + bx..y * width + x_end].fill(avg);
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rgb::RGBA8;

    #[test]
    fn zero_block_size_rejected() {
        let buf = PixelBuffer::filled(2, 2, RGBA8::new(1, 2, 3, 4));
        assert!(matches!(
            block_average(&buf, 0),
            Err(PixelateError::InvalidConfiguration {
                field: "block_size",
                value: 0
            })
        ));
    }

    #[test]
    fn half_rounds_up() {
        let buf = PixelBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 1, 0, 255]).unwrap();
        let out = block_average(&buf, 2).unwrap();
        assert_eq!(out.pixel(0, 0), RGBA8::new(128, 1, 0, 255));
        assert_eq!(out.pixel(1, 0), RGBA8::new(128, 1, 0, 255));
    }

    #[test]
    fn edge_blocks_are_clipped() {
        // 3x1 with block 2: [a b | c] -> c keeps its own value
        let buf = PixelBuffer::new(
            3,
            1,
            vec![10, 10, 10, 255, 20, 20, 20, 255, 200, 100, 50, 7],
        )
        .unwrap();
        let out = block_average(&buf, 2).unwrap();
        assert_eq!(out.pixel(0, 0), RGBA8::new(15, 15, 15, 255));
        assert_eq!(out.pixel(1, 0), RGBA8::new(15, 15, 15, 255));
        assert_eq!(out.pixel(2, 0), RGBA8::new(200, 100, 50, 7));
    }

    #[test]
    fn block_larger_than_image() {
        let buf = PixelBuffer::new(1, 2, vec![0, 0, 0, 0, 3, 3, 3, 3]).unwrap();
        let out = block_average(&buf, 64).unwrap();
        assert_eq!(out.pixel(0, 0), RGBA8::new(2, 2, 2, 2));
        assert_eq!(out.pixel(0, 1), RGBA8::new(2, 2, 2, 2));
    }

    #[test]
    fn input_is_not_modified() {
        let buf = PixelBuffer::new(2, 1, vec![0, 0, 0, 0, 100, 100, 100, 100]).unwrap();
        let before = buf.clone();
        let _ = block_average(&buf, 2).unwrap();
        assert_eq!(buf, before);
    }
}
