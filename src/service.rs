//! Prompt-to-image entry point around an external generative service.
//!
//! The service itself lives outside this crate. It hands back encoded image
//! bytes or an error; either way the caller gets pixel art, because a missing,
//! failing, or undecodable service result falls back to [`sketch`](crate::sketch).

use core::convert::Infallible;
use core::fmt::Display;

use crate::buffer::PixelBuffer;
use crate::codec::decode_png;
use crate::error::PixelateError;
use crate::sketch::{SketchConfig, sketch};
use crate::{PixelationConfig, pixelate};

/// What to ask the generative service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtRequest<'a> {
    pub prompt: &'a str,
    pub style: Option<&'a str>,
    /// Requested output size in pixels.
    pub size: (u32, u32),
    pub credential: Option<&'a str>,
}

impl<'a> ArtRequest<'a> {
    pub fn new(prompt: &'a str, size: (u32, u32)) -> Self {
        Self {
            prompt,
            style: None,
            size,
            credential: None,
        }
    }

    pub fn style(mut self, style: &'a str) -> Self {
        self.style = Some(style);
        self
    }

    pub fn credential(mut self, credential: &'a str) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// An external text-to-image generator returning PNG bytes.
pub trait ArtService {
    type Error: Display;

    fn generate(&self, request: &ArtRequest<'_>) -> Result<Vec<u8>, Self::Error>;
}

/// A service that is never available. Use as `None::<&NoService>`.
///
/// The type has no values, so `Some(&NoService)` cannot be written.
#[derive(Debug, Clone, Copy)]
pub enum NoService {}

impl ArtService for NoService {
    type Error = Infallible;

    fn generate(&self, _request: &ArtRequest<'_>) -> Result<Vec<u8>, Infallible> {
        match *self {}
    }
}

/// Where the image behind a [`render_prompt`] result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtSource {
    Service,
    Sketch,
}

/// Sketch sized to cover `size` with cells of one pixelation block each.
fn fallback_sketch(
    request: &ArtRequest<'_>,
    block_size: u32,
) -> Result<PixelBuffer, PixelateError> {
    let cell = block_size.max(1);
    let config = SketchConfig::new()
        .columns(request.size.0.div_ceil(cell).max(1))
        .rows(request.size.1.div_ceil(cell).max(1))
        .cell_size(cell);
    sketch(request.prompt, &config)
}

/// Get an image for `request` and pixelate it with `config`.
///
/// Tries `service` once. No service, a service error, or bytes that do not
/// decode as PNG all fall back to a prompt-seeded sketch. Configuration
/// errors are reported before the service is called.
pub fn render_prompt<S: ArtService>(
    service: Option<&S>,
    request: &ArtRequest<'_>,
    config: &PixelationConfig,
) -> Result<(PixelBuffer, ArtSource), PixelateError> {
    config.validate()?;

    let generated = service.and_then(|s| match s.generate(request) {
        Ok(bytes) => match decode_png(&bytes) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                log::warn!("art service returned an undecodable image: {e}");
                None
            }
        },
        Err(e) => {
            log::warn!("art service failed: {e}");
            None
        }
    });

    let (source_image, source) = match generated {
        Some(buffer) => (buffer, ArtSource::Service),
        None => (
            fallback_sketch(request, config.block_size)?,
            ArtSource::Sketch,
        ),
    };

    Ok((pixelate(&source_image, config)?, source))
}
