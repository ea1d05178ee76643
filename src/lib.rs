#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod block;
pub mod buffer;
#[cfg(feature = "png")]
pub mod codec;
pub mod dither;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod kmeans;
pub mod median_cut;
pub mod posterize;
pub mod remap;
#[cfg(feature = "png")]
pub mod service;
pub mod sketch;

pub use block::block_average;
pub use buffer::PixelBuffer;
pub use error::PixelateError;
pub use grid::draw_grid;
pub use histogram::{Color, ColorHistogram};
pub use rgb::RGBA8;
pub use sketch::{SketchConfig, sketch};

use alloc::vec::Vec;

/// Palette sizes at or above this are left alone by the quantizer.
pub const MAX_QUANTIZED_COLORS: u32 = 256;

/// Color reduction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Uniform per-channel step of `floor(256 / sqrt(k))`. No color analysis.
    Simple,
    /// Ten rounds of k-means over the distinct colors, seeded in first-seen order.
    KMeans,
    /// Median cut over the distinct colors with frequency-weighted representatives.
    #[default]
    MedianCut,
    /// Uniform per-channel step with `floor(log2(k) / 3)` bits per channel.
    ///
    /// Named after the octree family it approximates; it builds no tree.
    Octree,
}

impl Algorithm {
    /// Parse `simple`, `kmeans`, `median-cut` or `octree`.
    ///
    /// Anything else selects [`Algorithm::Simple`] rather than failing.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "simple" => Self::Simple,
            "kmeans" => Self::KMeans,
            "median-cut" => Self::MedianCut,
            "octree" => Self::Octree,
            other => {
                log::warn!("unknown quantization algorithm {other:?}, using simple");
                Self::Simple
            }
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::KMeans => "kmeans",
            Self::MedianCut => "median-cut",
            Self::Octree => "octree",
        }
    }
}

/// Configuration for the pixelation pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelationConfig {
    /// Side of each averaging block in pixels.
    pub block_size: u32,
    /// Desired palette size. 256 or more skips color reduction.
    pub target_colors: u32,
    /// Color reduction algorithm.
    pub algorithm: Algorithm,
    /// Error-diffuse block colors against the reduced palette.
    pub dithering: bool,
    /// Grid line spacing. Defaults to `block_size`.
    pub block_grid_size: Option<u32>,
    /// Grid line color. The grid is only drawn when this is set.
    pub grid_color: Option<RGBA8>,
}

impl Default for PixelationConfig {
    fn default() -> Self {
        Self {
            block_size: 8,
            target_colors: 16,
            algorithm: Algorithm::MedianCut,
            dithering: false,
            block_grid_size: None,
            grid_color: None,
        }
    }
}

impl PixelationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_size(mut self, size: u32) -> Self {
        self.block_size = size;
        self
    }

    pub fn target_colors(mut self, n: u32) -> Self {
        self.target_colors = n;
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn dithering(mut self, enabled: bool) -> Self {
        self.dithering = enabled;
        self
    }

    pub fn block_grid_size(mut self, size: u32) -> Self {
        self.block_grid_size = Some(size);
        self
    }

    pub fn grid_color(mut self, color: RGBA8) -> Self {
        self.grid_color = Some(color);
        self
    }

    /// Spacing used for the grid overlay.
    pub fn grid_spacing(&self) -> u32 {
        self.block_grid_size.unwrap_or(self.block_size)
    }

    /// Check every numeric field before any stage runs.
    pub fn validate(&self) -> Result<(), PixelateError> {
        if self.block_size == 0 {
            return Err(PixelateError::config("block_size", self.block_size));
        }
        if self.target_colors == 0 {
            return Err(PixelateError::config("target_colors", self.target_colors));
        }
        if self.block_grid_size == Some(0) {
            return Err(PixelateError::config("block_grid_size", 0));
        }
        Ok(())
    }
}

/// Reduce the RGB colors of `buffer` toward `target_colors`.
///
/// K-means, median cut and octree never exceed `target_colors` colors; the
/// simple step bounds levels per channel instead. Alpha is copied through
/// untouched. At 256 colors or more the input is returned as is. An empty
/// buffer gives an empty buffer.
pub fn quantize(
    buffer: &PixelBuffer,
    target_colors: u32,
    algorithm: Algorithm,
) -> Result<PixelBuffer, PixelateError> {
    if target_colors == 0 {
        return Err(PixelateError::config("target_colors", target_colors));
    }
    if buffer.is_empty() || target_colors >= MAX_QUANTIZED_COLORS {
        return Ok(buffer.clone());
    }

    let out = match algorithm {
        Algorithm::Simple => {
            posterize::posterize(buffer, posterize::simple_step(target_colors))
        }
        Algorithm::Octree => {
            posterize::posterize(buffer, posterize::octree_step(target_colors))
        }
        Algorithm::KMeans => {
            let hist = ColorHistogram::from_pixels(buffer.pixels());
            let centroids = kmeans::kmeans(&hist, target_colors as usize);
            remap::remap_to_palette(buffer, &hist, &centroids)
        }
        Algorithm::MedianCut => {
            let hist = ColorHistogram::from_pixels(buffer.pixels());
            let representatives = median_cut::median_cut(&hist, target_colors as usize);
            remap::remap_to_palette(buffer, &hist, &representatives)
        }
    };

    Ok(out)
}

/// Run the pixelation pipeline over a validated buffer.
///
/// Block averaging, then color reduction when `target_colors < 256`, then
/// dithering when enabled and colors were reduced, then the grid overlay when
/// a grid color is set.
/// The input buffer is never modified.
pub fn pixelate(
    buffer: &PixelBuffer,
    config: &PixelationConfig,
) -> Result<PixelBuffer, PixelateError> {
    config.validate()?;

    let averaged = block::block_average(buffer, config.block_size)?;

    let reduce = config.target_colors < MAX_QUANTIZED_COLORS;
    let mut out = if reduce {
        quantize(&averaged, config.target_colors, config.algorithm)?
    } else {
        averaged.clone()
    };

    // Without reduction every block already holds its own exact color.
    if config.dithering && reduce {
        out = dither::dither_blocks(&averaged, &out, config.block_size);
    }

    if let Some(color) = config.grid_color {
        out = grid::draw_grid(&out, config.grid_spacing(), color)?;
    }

    if reduce {
        log::debug!(
            "pixelate: {}x{} block {} -> {} colors with {}",
            buffer.width(),
            buffer.height(),
            config.block_size,
            config.target_colors,
            config.algorithm.tag()
        );
    } else {
        log::debug!(
            "pixelate: {}x{} block {}, {} target colors, quantization skipped",
            buffer.width(),
            buffer.height(),
            config.block_size,
            config.target_colors
        );
    }

    Ok(out)
}

/// Run the pipeline over raw RGBA bytes.
///
/// The byte length is checked against the dimensions before anything else.
pub fn pixelate_raw(
    data: &[u8],
    width: usize,
    height: usize,
    config: &PixelationConfig,
) -> Result<Vec<u8>, PixelateError> {
    let buffer = PixelBuffer::new(width, height, data.to_vec())?;
    pixelate(&buffer, config).map(PixelBuffer::into_bytes)
}
