use rand::{Rng, rngs::StdRng};

use super::{CELL, Game, Screen};

const COLS: usize = 12;
const ROWS: usize = 20;
const BRICK_TOP: usize = 2;
const BRICK_ROWS: usize = 6;
/// Points per brick row, top row first
const ROW_POINTS: [f32; BRICK_ROWS] = [7.0, 7.0, 4.0, 4.0, 1.0, 1.0];
const PADDLE_WIDTH: usize = 3;
const PADDLE_ROW: usize = ROWS - 1;
/// Frames between two cells of ball movement
const BALL_FRAMES: u32 = 2;
const LIVES: u32 = 5;

const ACTIONS: &[&str] = &["NOOP", "FIRE", "RIGHT", "LEFT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ball {
    x: i32,
    y: i32,
    dx: i32,
    dy: i32,
}

/// Grid Breakout: clear the wall with a ball bounced off the paddle
///
/// The ball is served with FIRE. Bricks score by row, higher rows more.
/// Losing the ball below the paddle costs a life.
#[derive(Debug, Clone)]
pub struct Breakout {
    bricks: [[bool; COLS]; BRICK_ROWS],
    paddle: usize,
    ball: Option<Ball>,
    frame: u32,
    lives: u32,
}

impl Breakout {
    pub fn new() -> Self {
        Self {
            bricks: [[true; COLS]; BRICK_ROWS],
            paddle: (COLS - PADDLE_WIDTH) / 2,
            ball: None,
            frame: 0,
            lives: LIVES,
        }
    }

    fn bricks_left(&self) -> usize {
        self.bricks.iter().flatten().filter(|&&b| b).count()
    }

    fn brick_at(&mut self, x: i32, y: i32) -> Option<&mut bool> {
        let row = (y as usize).checked_sub(BRICK_TOP)?;
        self.bricks
            .get_mut(row)
            .and_then(|r| r.get_mut(x as usize))
            .filter(|b| **b)
    }

    fn serve(&mut self, rng: &mut StdRng) {
        let dx = if rng.gen_bool(0.5) { 1 } else { -1 };
        self.ball = Some(Ball {
            x: (self.paddle + PADDLE_WIDTH / 2) as i32,
            y: PADDLE_ROW as i32 - 1,
            dx,
            dy: -1,
        });
    }

    /// Move the ball one cell, returning the points scored
    fn advance_ball(&mut self) -> f32 {
        let Some(mut ball) = self.ball else {
            return 0.0;
        };

        let mut nx = ball.x + ball.dx;
        if nx < 0 || nx >= COLS as i32 {
            ball.dx = -ball.dx;
            nx = ball.x + ball.dx;
        }
        let mut ny = ball.y + ball.dy;
        if ny < 0 {
            ball.dy = 1;
            ny = ball.y + ball.dy;
        }

        let mut reward = 0.0;
        let hit_brick = self.brick_at(nx, ny).map(|brick| *brick = false).is_some();
        if hit_brick {
            reward = ROW_POINTS[ny as usize - BRICK_TOP];
            ball.dy = -ball.dy;
            ball.x = nx;
        } else if ny == PADDLE_ROW as i32 {
            let offset = nx - self.paddle as i32;
            if (0..PADDLE_WIDTH as i32).contains(&offset) {
                ball.dy = -1;
                ball.dx = match offset {
                    0 => -1,
                    o if o == PADDLE_WIDTH as i32 - 1 => 1,
                    _ => ball.dx,
                };
                ball.x = nx;
            } else {
                self.lives -= 1;
                self.ball = None;
                return 0.0;
            }
        } else {
            ball.x = nx;
            ball.y = ny;
        }

        self.ball = Some(ball);
        reward
    }
}

impl Default for Breakout {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Breakout {
    fn name(&self) -> &'static str {
        "Breakout"
    }

    fn action_meanings(&self) -> &'static [&'static str] {
        ACTIONS
    }

    fn screen_size(&self) -> (usize, usize) {
        (COLS * CELL, ROWS * CELL)
    }

    fn reset(&mut self, _rng: &mut StdRng) {
        *self = Self::new();
    }

    fn act(&mut self, action: usize, rng: &mut StdRng) -> f32 {
        if self.game_over() {
            return 0.0;
        }

        match action {
            1 if self.ball.is_none() => self.serve(rng),
            2 => self.paddle = (self.paddle + 1).min(COLS - PADDLE_WIDTH),
            3 => self.paddle = self.paddle.saturating_sub(1),
            _ => {}
        }

        self.frame += 1;
        if self.frame % BALL_FRAMES != 0 {
            return 0.0;
        }
        self.advance_ball()
    }

    fn lives(&self) -> u32 {
        self.lives
    }

    fn game_over(&self) -> bool {
        self.lives == 0 || self.bricks_left() == 0
    }

    fn draw(&self, screen: &mut Screen) {
        screen.clear();
        for (row, bricks) in self.bricks.iter().enumerate() {
            // Brighter bricks are worth more
            let shade = 90 + (BRICK_ROWS - row) as u8 * 20;
            for (col, _) in bricks.iter().enumerate().filter(|(_, b)| **b) {
                screen.fill_rect(col * CELL, (BRICK_TOP + row) * CELL, CELL - 1, CELL - 1, shade);
            }
        }
        screen.fill_rect(
            self.paddle * CELL,
            PADDLE_ROW * CELL,
            PADDLE_WIDTH * CELL,
            CELL / 2,
            200,
        );
        if let Some(ball) = self.ball {
            screen.fill_rect(
                ball.x as usize * CELL + CELL / 4,
                ball.y as usize * CELL + CELL / 4,
                CELL / 2,
                CELL / 2,
                255,
            );
        }
    }
}
