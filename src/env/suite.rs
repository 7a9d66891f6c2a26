//! Load environments by name
//!
//! Names follow the gym convention `<Game>[NoFrameskip|Deterministic]-v<N>`.
//! The game part is matched case-insensitively against the built-in games
//! and the variant suffixes are accepted for compatibility; every loaded
//! environment uses the same preprocessing pipeline.

use burn::tensor::backend::Backend;
use log::info;

use super::AtariEnvironment;
use super::games::{Breakout, Catch, Game};
use crate::error::{AtariError, AtariResult};

const VARIANT_SUFFIXES: &[&str] = &["NoFrameskip", "Deterministic"];

/// Names of the games that [`load`] can build
pub fn available_environments() -> &'static [&'static str] {
    &["Breakout", "Catch"]
}

/// Build the named environment wrapped in Atari preprocessing
///
/// `eval_env` keeps an episode running across lost lives.
pub fn load<B: Backend>(
    environment_name: &str,
    eval_env: bool,
    device: &B::Device,
) -> AtariResult<AtariEnvironment<B>> {
    let game = game_by_name(environment_name)?;
    info!(
        "Loaded environment {} ({} actions, eval: {})",
        environment_name,
        game.num_actions(),
        eval_env
    );
    Ok(AtariEnvironment::new(game, eval_env, device))
}

fn game_by_name(environment_name: &str) -> AtariResult<Box<dyn Game>> {
    let base = base_name(environment_name);
    match base.to_ascii_lowercase().as_str() {
        "breakout" => Ok(Box::new(Breakout::new())),
        "catch" => Ok(Box::new(Catch::new())),
        _ => Err(AtariError::UnknownEnvironment(format!(
            "{} (available: {})",
            environment_name,
            available_environments().join(", ")
        ))),
    }
}

/// Strip the version and variant suffixes from a gym style name
fn base_name(environment_name: &str) -> &str {
    let mut name = environment_name.trim();
    if let Some((head, version)) = name.rsplit_once("-v") {
        if !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()) {
            name = head;
        }
    }
    for suffix in VARIANT_SUFFIXES {
        if let Some(head) = name.strip_suffix(suffix) {
            name = head;
            break;
        }
    }
    name
}
