use thiserror::Error;

#[derive(Debug, Error)]
pub enum PixelateError {
    #[error("invalid configuration: {field} must be positive, got {value}")]
    InvalidConfiguration { field: &'static str, value: u32 },

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[cfg(feature = "png")]
    #[error("png decode failed: {0}")]
    Decode(#[from] png::DecodingError),

    #[cfg(feature = "png")]
    #[error("png encode failed: {0}")]
    Encode(#[from] png::EncodingError),

    #[cfg(feature = "png")]
    #[error("unsupported png layout: {0}")]
    UnsupportedPng(&'static str),
}

impl PixelateError {
    pub(crate) fn config(field: &'static str, value: u32) -> Self {
        Self::InvalidConfiguration { field, value }
    }
}
