//! End-to-end: PNG in, pixel art out, plus the prompt path with and without
//! an art service.
#![cfg(feature = "png")]

use pixquant::codec::{decode_png, encode_png};
use pixquant::service::{ArtRequest, ArtService, ArtSource, NoService, render_prompt};
use pixquant::{Algorithm, PixelBuffer, PixelationConfig, RGBA8, SketchConfig, sketch};

fn photo_like(width: usize, height: usize) -> PixelBuffer {
    let mut pixels = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width) as u8;
            let g = ((x + y) * 127 / (width + height)) as u8;
            let b = (y * 255 / height) as u8;
            let a = if (x / 4 + y / 4) % 5 == 0 { 128 } else { 255 };
            pixels.push(RGBA8::new(r, g, b, a));
        }
    }
    PixelBuffer::from_pixels(width, height, &pixels).unwrap()
}

#[test]
fn png_pipeline_round_trip() {
    let source = photo_like(48, 32);
    let encoded = encode_png(&source).unwrap();

    for algorithm in [
        Algorithm::Simple,
        Algorithm::KMeans,
        Algorithm::MedianCut,
        Algorithm::Octree,
    ] {
        let config = PixelationConfig::new()
            .block_size(4)
            .target_colors(8)
            .algorithm(algorithm)
            .dithering(true);

        let decoded = decode_png(&encoded).unwrap();
        assert_eq!(decoded, source);

        let art = pixquant::pixelate(&decoded, &config).unwrap();
        let reencoded = encode_png(&art).unwrap();
        assert_eq!(decode_png(&reencoded).unwrap(), art, "{algorithm:?}");
    }
}

#[test]
fn sketch_survives_pixelation_unchanged() {
    // Sketch cells already line up with the blocks and use five colors.
    let config = SketchConfig::new().columns(10).rows(6).cell_size(4);
    let img = sketch("a cat under the sun", &config).unwrap();
    let pixel_config = PixelationConfig::new()
        .block_size(4)
        .target_colors(5)
        .algorithm(Algorithm::MedianCut);
    assert_eq!(pixquant::pixelate(&img, &pixel_config).unwrap(), img);
}

struct CannedPng(Vec<u8>);

impl ArtService for CannedPng {
    type Error = String;

    fn generate(&self, request: &ArtRequest<'_>) -> Result<Vec<u8>, String> {
        match request.credential {
            Some("valid") => Ok(self.0.clone()),
            _ => Err("401 unauthorized".to_string()),
        }
    }
}

#[test]
fn service_output_is_repixelated() {
    let source = photo_like(16, 16);
    let service = CannedPng(encode_png(&source).unwrap());
    let config = PixelationConfig::new().block_size(4).target_colors(4);

    let request = ArtRequest::new("anything", (16, 16)).credential("valid");
    let (art, origin) = render_prompt(Some(&service), &request, &config).unwrap();
    assert_eq!(origin, ArtSource::Service);
    assert_eq!(art, pixquant::pixelate(&source, &config).unwrap());
}

#[test]
fn rejected_credential_falls_back_to_sketch() {
    let service = CannedPng(Vec::new());
    let config = PixelationConfig::new().block_size(4).target_colors(256);
    let request = ArtRequest::new("a tree", (20, 12)).credential("expired");

    let (art, origin) = render_prompt(Some(&service), &request, &config).unwrap();
    assert_eq!(origin, ArtSource::Sketch);

    let (again, _) = render_prompt(None::<&NoService>, &request, &config).unwrap();
    assert_eq!(art, again);
}

#[test]
fn garbage_from_service_falls_back() {
    let service = CannedPng(b"<html>rate limited</html>".to_vec());
    let config = PixelationConfig::new().block_size(2);
    let request = ArtRequest::new("house", (8, 8)).credential("valid");
    let (art, origin) = render_prompt(Some(&service), &request, &config).unwrap();
    assert_eq!(origin, ArtSource::Sketch);
    assert_eq!((art.width(), art.height()), (8, 8));
}
