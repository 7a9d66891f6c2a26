//! Standard Atari preprocessing around a raw [`Game`]
//!
//! - every agent action is repeated for [`FRAME_SKIP`] frames and the last
//!   two frames are max-pooled to remove flicker
//! - frames are resized to [`SCREEN_SIZE`]² with box-filter averaging
//! - the last [`STACK_SIZE`] frames are stacked on the channel axis
//! - episodes are capped at [`MAX_EPISODE_STEPS`] agent steps
//! - training environments end the episode on every lost life, evaluation
//!   environments only when the game is over

use anyhow::{Result, bail};
use burn::tensor::{Tensor, TensorData, backend::Backend};
use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::VecDeque;

use super::games::{Game, Screen};
use super::{ArraySpec, BoundedArraySpec, Environment, RenderMode, StepType, TimeStep};
use crate::render::{Status, Viewer};

pub const FRAME_SKIP: usize = 4;
pub const SCREEN_SIZE: usize = 84;
pub const STACK_SIZE: usize = 4;
/// 108 000 frames at four frames per step
pub const MAX_EPISODE_STEPS: usize = 27_000;

pub struct AtariEnvironment<B: Backend> {
    game: Box<dyn Game>,
    eval_env: bool,
    max_episode_steps: usize,
    rng: StdRng,
    /// Second to last and last raw frame of the current step
    frames: [Screen; 2],
    stack: VecDeque<Vec<f32>>,
    /// Type of the last returned time-step, `None` before the first reset
    current: Option<StepType>,
    lives: u32,
    episode_steps: usize,
    episode_reward: f32,
    viewer: Option<Viewer>,
    device: B::Device,
}

impl<B: Backend> AtariEnvironment<B> {
    pub fn new(game: Box<dyn Game>, eval_env: bool, device: &B::Device) -> Self {
        let (width, height) = game.screen_size();
        Self {
            game,
            eval_env,
            max_episode_steps: MAX_EPISODE_STEPS,
            rng: StdRng::from_entropy(),
            frames: [Screen::new(width, height), Screen::new(width, height)],
            stack: VecDeque::with_capacity(STACK_SIZE),
            current: None,
            lives: 0,
            episode_steps: 0,
            episode_reward: 0.0,
            viewer: None,
            device: device.clone(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed(seed);
        self
    }

    /// Reseed the game's random source; takes effect from the next reset
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn with_max_episode_steps(mut self, max_episode_steps: usize) -> Self {
        self.max_episode_steps = max_episode_steps;
        self
    }

    pub fn game(&self) -> &dyn Game {
        self.game.as_ref()
    }

    pub fn is_eval(&self) -> bool {
        self.eval_env
    }

    /// Reward collected since the last reset
    pub fn episode_reward(&self) -> f32 {
        self.episode_reward
    }

    /// Last raw frame, before pooling and resizing
    pub fn screen(&self) -> &Screen {
        &self.frames[1]
    }

    fn capture_frame(&mut self) {
        self.frames.swap(0, 1);
        self.game.draw(&mut self.frames[1]);
    }

    fn processed_frame(&self) -> Vec<f32> {
        self.frames[0]
            .max_pool(&self.frames[1])
            .resize_area(SCREEN_SIZE, SCREEN_SIZE)
    }

    /// Interleave the stacked frames into `[height, width, stack]`
    fn observation(&self) -> Tensor<B, 3> {
        let pixels = SCREEN_SIZE * SCREEN_SIZE;
        let mut data = Vec::with_capacity(pixels * STACK_SIZE);
        for i in 0..pixels {
            data.extend(self.stack.iter().map(|frame| frame[i]));
        }
        Tensor::from_data(
            TensorData::new(data, [SCREEN_SIZE, SCREEN_SIZE, STACK_SIZE]),
            &self.device,
        )
    }

    fn time_step(&mut self, step_type: StepType, reward: f32, discount: f32) -> TimeStep<B> {
        self.current = Some(step_type);
        TimeStep {
            step_type,
            reward,
            discount,
            observation: self.observation(),
        }
    }
}

impl<B: Backend> Environment<B> for AtariEnvironment<B> {
    fn observation_spec(&self) -> ArraySpec {
        ArraySpec {
            shape: vec![SCREEN_SIZE, SCREEN_SIZE, STACK_SIZE],
            name: "observation".to_string(),
        }
    }

    fn action_spec(&self) -> BoundedArraySpec {
        BoundedArraySpec {
            shape: vec![],
            minimum: 0,
            maximum: self.game.num_actions() as i64 - 1,
            name: "action".to_string(),
        }
    }

    fn reset(&mut self) -> Result<TimeStep<B>> {
        self.game.reset(&mut self.rng);
        self.lives = self.game.lives();
        self.episode_steps = 0;
        self.episode_reward = 0.0;

        self.capture_frame();
        self.capture_frame();
        let first = self.processed_frame();
        self.stack.clear();
        self.stack.extend(std::iter::repeat(first).take(STACK_SIZE));

        debug!("{} reset with {} lives", self.game.name(), self.lives);
        Ok(self.time_step(StepType::First, 0.0, 1.0))
    }

    fn step(&mut self, action: usize) -> Result<TimeStep<B>> {
        if matches!(self.current, None | Some(StepType::Last)) {
            return self.reset();
        }

        let num_actions = self.game.num_actions();
        if action >= num_actions {
            bail!(
                "action {} outside the action space [0, {})",
                action,
                num_actions
            );
        }

        let mut reward = 0.0;
        let mut life_lost = false;
        for _ in 0..FRAME_SKIP {
            reward += self.game.act(action, &mut self.rng);
            self.capture_frame();

            let lives = self.game.lives();
            life_lost |= lives < self.lives;
            self.lives = lives;
            if self.game.game_over() || (life_lost && !self.eval_env) {
                break;
            }
        }

        let frame = self.processed_frame();
        self.stack.pop_front();
        self.stack.push_back(frame);

        self.episode_steps += 1;
        self.episode_reward += reward;

        let terminal = self.game.game_over() || (life_lost && !self.eval_env);
        let truncated = self.episode_steps >= self.max_episode_steps;
        if terminal || truncated {
            info!(
                "{} episode finished after {} steps{}",
                self.game.name(),
                self.episode_steps,
                if terminal { "" } else { " (step limit)" }
            );
        }

        let step_type = if terminal || truncated {
            StepType::Last
        } else {
            StepType::Mid
        };
        let discount = if terminal { 0.0 } else { 1.0 };
        Ok(self.time_step(step_type, reward, discount))
    }

    fn render(&mut self, mode: RenderMode) -> Result<()> {
        if mode == RenderMode::Headless {
            return Ok(());
        }

        let status = Status {
            title: self.game.name().to_string(),
            episode_reward: self.episode_reward,
            lives: self.lives,
            steps: self.episode_steps,
        };
        if self.viewer.is_none() {
            self.viewer = Some(Viewer::new()?);
        }
        match self.viewer.as_mut() {
            Some(viewer) => viewer.draw(&self.frames[1], &status),
            None => Ok(()),
        }
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut viewer) = self.viewer.take() {
            viewer.close()?;
        }
        Ok(())
    }
}
