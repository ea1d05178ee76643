//! Pixelate a PNG, or sketch one from a prompt when no input is given.
//!
//! Usage:
//!   cargo run --example pixelate --release -- <input.png|--prompt TEXT> \
//!       [output.png] [block] [colors] [algorithm]

use pixquant::service::{ArtRequest, NoService, render_prompt};
use pixquant::{Algorithm, PixelationConfig, codec};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let usage =
        "usage: pixelate <input.png|--prompt TEXT> [output.png] [block] [colors] [algorithm]";
    let (prompt, rest) = match args.get(1).map(String::as_str) {
        Some("--prompt") => (Some(args.get(2).ok_or(usage)?.clone()), &args[3..]),
        Some(_) => (None, &args[2..]),
        None => return Err(usage.into()),
    };

    let output = rest.first().cloned().unwrap_or_else(|| "pixelated.png".to_string());
    let block: u32 = rest.get(1).map_or(Ok(8), |s| s.parse())?;
    let colors: u32 = rest.get(2).map_or(Ok(16), |s| s.parse())?;
    let algorithm = rest
        .get(3)
        .map_or(Algorithm::MedianCut, |s| Algorithm::from_tag(s));

    let config = PixelationConfig::new()
        .block_size(block)
        .target_colors(colors)
        .algorithm(algorithm);

    let result = match prompt {
        Some(text) => {
            let request = ArtRequest::new(&text, (256, 256));
            render_prompt(None::<&NoService>, &request, &config)?.0
        }
        None => {
            let input = std::fs::read(&args[1])?;
            pixquant::pixelate(&codec::decode_png(&input)?, &config)?
        }
    };

    std::fs::write(&output, codec::encode_png(&result)?)?;
    eprintln!(
        "{}x{} -> {output} (block {block}, {colors} colors, {})",
        result.width(),
        result.height(),
        algorithm.tag()
    );
    Ok(())
}
