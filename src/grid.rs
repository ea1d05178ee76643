use rgb::RGBA8;

use crate::buffer::PixelBuffer;
use crate::error::PixelateError;

/// Draw one-pixel grid lines every `spacing` pixels, starting at the top-left.
///
/// Pixels on column `x % spacing == 0` or row `y % spacing == 0` are replaced
/// with `color`, alpha included.
pub fn draw_grid(
    buffer: &PixelBuffer,
    spacing: u32,
    color: RGBA8,
) -> Result<PixelBuffer, PixelateError> {
    if spacing == 0 {
        return Err(PixelateError::config("block_grid_size", spacing));
    }

    let mut out = buffer.clone();
    let width = buffer.width();
    let spacing = spacing as usize;
    if width == 0 {
        return Ok(out);
    }

    for (y, row) in out.pixels_mut().chunks_exact_mut(width).enumerate() {
        if y % spacing == 0 {
            row.fill(color);
            continue;
        }
        for p in row.iter_mut().step_by(spacing) {
            *p = color;
        }
    }

    Ok(out)
}
