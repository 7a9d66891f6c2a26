//! Atari Demo - play back trained convolutional agents on Atari-style games
//!
//! This library provides:
//! - Bounded-weight agent networks and weight files (net module)
//! - Environments with Atari preprocessing and built-in games (env module)
//! - Terminal rendering (render module)
//! - The playback driver (modes module)
//! - The generation operator of the weight search (evo module)

pub mod env;
pub mod error;
pub mod evo;
pub mod logging;
pub mod modes;
pub mod net;
pub mod render;

pub use error::{AtariError, AtariResult};
