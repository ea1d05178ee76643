//! Deterministic block art from a text prompt.
//!
//! Used when there is no source image: the prompt seeds a small linear
//! congruential generator that paints a grid of cells from a named palette,
//! and a handful of keywords stamp simple shapes on top.

extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;

use crate::buffer::PixelBuffer;
use crate::error::PixelateError;
use crate::histogram::Color;

/// 32-bit rolling hash of the prompt's UTF-16 code units, made non-negative.
///
/// `hash = hash * 31 + unit` with signed 32-bit wraparound; the absolute value
/// of `i32::MIN` is `2^31`, which is why the result is a `u32`.
pub fn prompt_seed(text: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(unit as i32);
    }
    hash.unsigned_abs()
}

const LCG_MUL: u64 = 9301;
const LCG_INC: u64 = 49297;
const LCG_MOD: u64 = 233_280;

/// Linear congruential generator, one per sketch.
#[derive(Debug, Clone)]
pub struct PromptRng {
    state: u64,
}

impl PromptRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed as u64 }
    }

    pub fn from_prompt(text: &str) -> Self {
        Self::new(prompt_seed(text))
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (self.state * LCG_MUL + LCG_INC) % LCG_MOD;
        self.state as f64 / LCG_MOD as f64
    }

    /// Uniform index in `0..n`. `n` must be positive.
    pub fn below(&mut self, n: usize) -> usize {
        ((self.next_f64() * n as f64) as usize).min(n - 1)
    }
}

/// A fixed five-color palette. The first three entries are background tones,
/// then an accent and an ink color for shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedPalette {
    pub name: &'static str,
    keywords: &'static [&'static str],
    pub colors: [Color; 5],
}

impl NamedPalette {
    fn background(&self) -> &[Color] {
        &self.colors[..3]
    }

    fn accent(&self) -> Color {
        self.colors[3]
    }

    fn ink(&self) -> Color {
        self.colors[4]
    }

    fn matches(&self, prompt: &str) -> bool {
        prompt.contains(self.name) || self.keywords.iter().any(|k| prompt.contains(k))
    }
}

pub static PALETTES: [NamedPalette; 5] = [
    NamedPalette {
        name: "sunset",
        keywords: &["warm", "fire", "desert", "autumn"],
        colors: [
            [255, 183, 94],
            [255, 126, 95],
            [254, 180, 123],
            [255, 236, 139],
            [74, 35, 90],
        ],
    },
    NamedPalette {
        name: "ocean",
        keywords: &["sea", "water", "blue", "night", "wave"],
        colors: [
            [0, 119, 182],
            [0, 150, 199],
            [72, 202, 228],
            [202, 240, 248],
            [3, 4, 94],
        ],
    },
    NamedPalette {
        name: "forest",
        keywords: &["tree", "green", "nature", "grass"],
        colors: [
            [82, 183, 136],
            [64, 145, 108],
            [116, 198, 157],
            [216, 243, 220],
            [27, 67, 50],
        ],
    },
    NamedPalette {
        name: "candy",
        keywords: &["pink", "cute", "sweet", "cat"],
        colors: [
            [255, 200, 221],
            [255, 175, 204],
            [205, 180, 219],
            [162, 210, 255],
            [88, 44, 77],
        ],
    },
    NamedPalette {
        name: "retro",
        keywords: &["game", "arcade", "8-bit", "pixel"],
        colors: [
            [155, 188, 15],
            [139, 172, 15],
            [48, 98, 48],
            [202, 220, 159],
            [15, 56, 15],
        ],
    },
];

/// Size of a generated sketch.
#[derive(Debug, Clone)]
pub struct SketchConfig {
    /// Cells across.
    pub columns: u32,
    /// Cells down.
    pub rows: u32,
    /// Side of one cell in pixels.
    pub cell_size: u32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            columns: 16,
            rows: 16,
            cell_size: 8,
        }
    }
}

impl SketchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, n: u32) -> Self {
        self.columns = n;
        self
    }

    pub fn rows(mut self, n: u32) -> Self {
        self.rows = n;
        self
    }

    pub fn cell_size(mut self, n: u32) -> Self {
        self.cell_size = n;
        self
    }
}

/// Cell canvas with shape helpers in fractional coordinates (0..1 on each axis).
struct Canvas {
    cols: usize,
    rows: usize,
    cells: Vec<Color>,
}

fn abs(v: f64) -> f64 {
    if v < 0.0 { -v } else { v }
}

impl Canvas {
    fn unit(&self) -> f64 {
        self.cols.min(self.rows) as f64
    }

    /// Cell centers in canvas units.
    fn each_cell(&mut self, mut f: impl FnMut(f64, f64) -> Option<Color>) {
        for y in 0..self.rows {
            for x in 0..self.cols {
                let cx = (x as f64 + 0.5) / self.cols as f64;
                let cy = (y as f64 + 0.5) / self.rows as f64;
                if let Some(c) = f(cx, cy) {
                    self.cells[y * self.cols + x] = c;
                }
            }
        }
    }

    fn disc(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let (w, h, unit) = (self.cols as f64, self.rows as f64, self.unit());
        self.each_cell(|x, y| {
            let dx = (x - cx) * w / unit;
            let dy = (y - cy) * h / unit;
            (dx * dx + dy * dy <= radius * radius).then_some(color)
        });
    }

    fn rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        self.each_cell(|x, y| (x >= x0 && x < x1 && y >= y0 && y < y1).then_some(color));
    }

    /// Upward triangle with apex `(ax, ay)` and a base `half_base` wide each
    /// side at row `base_y`.
    fn triangle(&mut self, ax: f64, ay: f64, base_y: f64, half_base: f64, color: Color) {
        self.each_cell(|x, y| {
            if y < ay || y > base_y {
                return None;
            }
            let half = (y - ay) / (base_y - ay) * half_base;
            (abs(x - ax) <= half).then_some(color)
        });
    }

    fn set(&mut self, fx: f64, fy: f64, color: Color) {
        let x = ((fx * self.cols as f64) as usize).min(self.cols - 1);
        let y = ((fy * self.rows as f64) as usize).min(self.rows - 1);
        self.cells[y * self.cols + x] = color;
    }
}

/// Choose a palette by keyword, or with the generator when nothing matches.
pub fn choose_palette(prompt: &str, rng: &mut PromptRng) -> &'static NamedPalette {
    let lower = prompt.to_lowercase();
    match PALETTES.iter().find(|p| p.matches(&lower)) {
        Some(p) => p,
        None => &PALETTES[rng.below(PALETTES.len())],
    }
}

/// Paint a deterministic block-art image for `prompt`.
///
/// The same prompt and config always give the same pixels. Every cell gets a
/// random background tone, then keyword shapes are stamped in order: `sun`,
/// `tree`, `house`, `cat`. The image is fully opaque.
pub fn sketch(prompt: &str, config: &SketchConfig) -> Result<PixelBuffer, PixelateError> {
    for (field, value) in [
        ("columns", config.columns),
        ("rows", config.rows),
        ("cell_size", config.cell_size),
    ] {
        if value == 0 {
            return Err(PixelateError::config(field, value));
        }
    }

    let mut rng = PromptRng::from_prompt(prompt);
    let palette = choose_palette(prompt, &mut rng);
    let lower: String = prompt.to_lowercase();

    let (cols, rows) = (config.columns as usize, config.rows as usize);
    let background = palette.background();
    let cells = (0..cols * rows)
        .map(|_| background[rng.below(background.len())])
        .collect();
    let mut canvas = Canvas { cols, rows, cells };

    if lower.contains("sun") {
        canvas.disc(0.78, 0.22, 0.14, palette.accent());
    }
    if lower.contains("tree") {
        canvas.rect(0.45, 0.6, 0.55, 1.0, palette.ink());
        canvas.disc(0.5, 0.45, 0.22, palette.accent());
    }
    if lower.contains("house") {
        canvas.rect(0.25, 0.5, 0.75, 0.95, palette.accent());
        canvas.triangle(0.5, 0.25, 0.5, 0.3, palette.ink());
    }
    if lower.contains("cat") {
        canvas.triangle(0.33, 0.15, 0.4, 0.1, palette.ink());
        canvas.triangle(0.67, 0.15, 0.4, 0.1, palette.ink());
        canvas.disc(0.5, 0.55, 0.28, palette.ink());
        canvas.set(0.4, 0.5, palette.accent());
        canvas.set(0.6, 0.5, palette.accent());
    }

    log::debug!(
        "sketch: palette {} for {cols}x{rows} cells, seed {}",
        palette.name,
        prompt_seed(prompt)
    );

    let size = config.cell_size as usize;
    let (width, height) = (cols * size, rows * size);
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let c = canvas.cells[(y / size) * cols + x / size];
            data.extend_from_slice(&[c[0], c[1], c[2], 255]);
        }
    }

    PixelBuffer::new(width, height, data)
}
