extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use imgref::{ImgRef, ImgVec};
use rgb::{FromSlice, RGBA8};

use crate::error::PixelateError;

/// An owned RGBA8 image: `width * height` pixels, row-major, top-left origin.
///
/// The byte length is always `width * height * 4`. Zero-sized buffers are
/// valid and pass through every stage unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, checking the length against the dimensions.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, PixelateError> {
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(PixelateError::DimensionMismatch {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer from RGBA pixels.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: &[RGBA8],
    ) -> Result<Self, PixelateError> {
        let data = pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
        Self::new(width, height, data)
    }

    /// A buffer where every pixel is `color`.
    ///
    /// Panics when `width * height * 4` overflows `usize`.
    pub fn filled(width: usize, height: usize, color: RGBA8) -> Self {
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .unwrap_or_else(|| panic!("{width}x{height} buffer overflows usize"));
        let mut data = vec![0u8; len];
        for px in data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixel view of the raw bytes.
    pub fn pixels(&self) -> &[RGBA8] {
        self.data.as_rgba()
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [RGBA8] {
        self.data.as_rgba_mut()
    }

    /// Pixel at `(x, y)`. Panics when out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> RGBA8 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels()[y * self.width + x]
    }

    /// Borrow as an `imgref` image.
    pub fn as_img(&self) -> ImgRef<'_, RGBA8> {
        ImgRef::new(self.pixels(), self.width, self.height)
    }
}

impl From<ImgVec<RGBA8>> for PixelBuffer {
    fn from(img: ImgVec<RGBA8>) -> Self {
        let (width, height) = (img.width(), img.height());
        // `pixels()` skips stride padding, so the result is always contiguous.
        let data = img.pixels().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
        Self {
            width,
            height,
            data,
        }
    }
}
