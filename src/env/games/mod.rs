//! Built-in games driven by the preprocessing pipeline
//!
//! Games are plain state machines: one call to [`Game::act`] advances one
//! raw frame, and [`Game::draw`] paints the current frame as grayscale
//! pixels. Frame skipping, resizing and stacking happen in
//! [`AtariEnvironment`](super::AtariEnvironment).

pub mod breakout;
pub mod catch;

pub use breakout::Breakout;
pub use catch::Catch;

use rand::rngs::StdRng;

/// Side length in pixels of one cell of the game grids
pub const CELL: usize = 8;

/// Raw game simulation
pub trait Game {
    fn name(&self) -> &'static str;

    /// Human-readable meaning of every action index
    fn action_meanings(&self) -> &'static [&'static str];

    fn num_actions(&self) -> usize {
        self.action_meanings().len()
    }

    /// Native screen size as `(width, height)` in pixels
    fn screen_size(&self) -> (usize, usize);

    /// Start a new game
    fn reset(&mut self, rng: &mut StdRng);

    /// Advance one frame with `action`, returning the reward earned
    fn act(&mut self, action: usize, rng: &mut StdRng) -> f32;

    fn lives(&self) -> u32;

    fn game_over(&self) -> bool;

    fn draw(&self, screen: &mut Screen);
}

/// Grayscale frame buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Screen {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Fill a rectangle, clipped to the screen
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, value: u8) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.pixels[start + x.min(x_end)..start + x_end].fill(value);
        }
    }

    /// Fill one grid cell of side [`CELL`]
    pub fn fill_cell(&mut self, col: usize, row: usize, value: u8) {
        self.fill_rect(col * CELL, row * CELL, CELL, CELL, value);
    }

    /// Pixel-wise maximum of two equally sized screens
    pub fn max_pool(&self, other: &Screen) -> Screen {
        Screen {
            width: self.width,
            height: self.height,
            pixels: self
                .pixels
                .iter()
                .zip(&other.pixels)
                .map(|(&a, &b)| a.max(b))
                .collect(),
        }
    }

    /// Downsample with box-filter averaging, returned row-major
    pub fn resize_area(&self, out_width: usize, out_height: usize) -> Vec<f32> {
        let mut out = Vec::with_capacity(out_width * out_height);
        for oy in 0..out_height {
            let (y0, y1) = source_span(oy, out_height, self.height);
            for ox in 0..out_width {
                let (x0, x1) = source_span(ox, out_width, self.width);
                let mut sum = 0u32;
                for y in y0..y1 {
                    let row = &self.pixels[y * self.width..(y + 1) * self.width];
                    sum += row[x0..x1].iter().map(|&p| p as u32).sum::<u32>();
                }
                out.push(sum as f32 / ((y1 - y0) * (x1 - x0)) as f32);
            }
        }
        out
    }
}

/// Source pixel range covered by output pixel `index`; never empty
fn source_span(index: usize, out_len: usize, src_len: usize) -> (usize, usize) {
    let start = index * src_len / out_len;
    let end = ((index + 1) * src_len / out_len).max(start + 1).min(src_len);
    (start.min(src_len - 1), end)
}
