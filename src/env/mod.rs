//! Environment interface for agent playback
//!
//! Provides:
//! - The [`Environment`] trait with TF-Agents style specs and time-steps
//! - Atari preprocessing around raw games (frame skip, resize, stacking)
//! - Built-in games and name-based loading through [`suite::load`]

pub mod games;
pub mod preprocessing;
pub mod suite;

pub use games::{Game, Screen};
pub use preprocessing::AtariEnvironment;

use anyhow::Result;
use burn::tensor::{Tensor, backend::Backend};

/// Position of a time-step within its episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepType {
    First,
    Mid,
    Last,
}

/// Everything an environment returns for one tick
#[derive(Debug, Clone)]
pub struct TimeStep<B: Backend> {
    pub step_type: StepType,
    pub reward: f32,
    pub discount: f32,
    /// Observation with shape `[height, width, channels]`
    pub observation: Tensor<B, 3>,
}

impl<B: Backend> TimeStep<B> {
    pub fn is_first(&self) -> bool {
        self.step_type == StepType::First
    }

    pub fn is_last(&self) -> bool {
        self.step_type == StepType::Last
    }
}

/// Shape of an unbounded array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySpec {
    pub shape: Vec<usize>,
    pub name: String,
}

/// Shape and inclusive integer bounds of a discrete array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedArraySpec {
    pub shape: Vec<usize>,
    pub minimum: i64,
    pub maximum: i64,
    pub name: String,
}

impl BoundedArraySpec {
    /// Number of distinct values, `maximum - minimum + 1`
    pub fn num_values(&self) -> usize {
        (self.maximum - self.minimum + 1).max(0) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Draw the current frame to the terminal
    Human,
    /// Render nothing
    Headless,
}

/// Discrete-action environment stepped one agent action at a time
pub trait Environment<B: Backend> {
    fn observation_spec(&self) -> ArraySpec;

    fn action_spec(&self) -> BoundedArraySpec;

    /// Start a new episode
    fn reset(&mut self) -> Result<TimeStep<B>>;

    /// Apply `action`. Stepping after a last time-step starts a new episode.
    fn step(&mut self, action: usize) -> Result<TimeStep<B>>;

    fn render(&mut self, mode: RenderMode) -> Result<()>;

    /// Release rendering resources
    fn close(&mut self) -> Result<()>;
}
