//! PNG decode/encode for [`PixelBuffer`].
//!
//! Decoding expands every PNG layout to 8-bit RGBA; encoding always writes
//! 8-bit RGBA. No gamma or color-space transforms are applied either way, so
//! a decode of an encode returns the exact bytes.

use std::io::Cursor;

use crate::buffer::PixelBuffer;
use crate::error::PixelateError;

/// Decode PNG bytes into an RGBA8 buffer.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, PixelateError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(
        png::Transformations::EXPAND | png::Transformations::STRIP_16 | png::Transformations::ALPHA,
    );
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    buf.truncate(frame.buffer_size());

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(PixelateError::UnsupportedPng("bit depth after expansion is not 8"));
    }

    let (width, height) = (frame.width as usize, frame.height as usize);
    let rgba = match frame.color_type {
        png::ColorType::Rgba => buf,
        png::ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(PixelateError::UnsupportedPng("indexed color was not expanded"));
        }
    };

    log::debug!("decoded {width}x{height} png ({:?})", frame.color_type);
    PixelBuffer::new(width, height, rgba)
}

/// Encode an RGBA8 buffer as PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>, PixelateError> {
    if buffer.is_empty() {
        return Err(PixelateError::UnsupportedPng("png cannot hold a zero-sized image"));
    }

    let mut out = Vec::new();
    {
        let mut encoder =
            png::Encoder::new(&mut out, buffer.width() as u32, buffer.height() as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(buffer.as_bytes())?;
        writer.finish()?;
    }
    Ok(out)
}
