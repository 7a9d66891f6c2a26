use rand::{Rng, rngs::StdRng};

use super::{CELL, Game, Screen};

const COLS: usize = 10;
const ROWS: usize = 16;
/// Frames between two rows of ball movement
const FALL_FRAMES: u32 = 2;
const LIVES: u32 = 3;
const BALLS_PER_GAME: u32 = 20;

const ACTIONS: &[&str] = &["NOOP", "LEFT", "RIGHT"];

/// Catch falling balls with a paddle on the bottom row
///
/// +1 for every ball caught, -1 and one life for every ball missed. The
/// game ends when the lives run out or the last ball has landed.
#[derive(Debug, Clone)]
pub struct Catch {
    paddle: usize,
    ball: (usize, usize),
    frame: u32,
    balls: u32,
    lives: u32,
}

impl Catch {
    pub fn new() -> Self {
        Self {
            paddle: COLS / 2,
            ball: (COLS / 2, 0),
            frame: 0,
            balls: 0,
            lives: LIVES,
        }
    }

    fn drop_ball(&mut self, rng: &mut StdRng) {
        self.ball = (rng.gen_range(0..COLS), 0);
    }
}

impl Default for Catch {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Catch {
    fn name(&self) -> &'static str {
        "Catch"
    }

    fn action_meanings(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn screen_size(&self) -> (usize, usize) {
        (COLS * CELL, ROWS * CELL)
    }

    fn reset(&mut self, rng: &mut StdRng) {
        *self = Self::new();
        self.drop_ball(rng);
    }

    fn act(&mut self, action: usize, rng: &mut StdRng) -> f32 {
        if self.game_over() {
            return 0.0;
        }

        match action {
            1 => self.paddle = self.paddle.saturating_sub(1),
            2 => self.paddle = (self.paddle + 1).min(COLS - 1),
            _ => {}
        }

        self.frame += 1;
        if self.frame % FALL_FRAMES != 0 {
            return 0.0;
        }

        self.ball.1 += 1;
        if self.ball.1 < ROWS - 1 {
            return 0.0;
        }

        self.balls += 1;
        let reward = if self.ball.0 == self.paddle {
            1.0
        } else {
            self.lives -= 1;
            -1.0
        };
        if !self.game_over() {
            self.drop_ball(rng);
        }
        reward
    }

    fn lives(&self) -> u32 {
        self.lives
    }

    fn game_over(&self) -> bool {
        self.lives == 0 || self.balls >= BALLS_PER_GAME
    }

    fn draw(&self, screen: &mut Screen) {
        screen.clear();
        screen.fill_cell(self.ball.0, self.ball.1, 255);
        screen.fill_cell(self.paddle, ROWS - 1, 160);
    }
}
