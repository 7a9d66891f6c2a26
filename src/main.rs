use anyhow::{Context, Result};
use atari_demo::env::RenderMode;
use atari_demo::logging::init_logging;
use atari_demo::modes::AtariDemo;
use atari_demo::net::{InferenceBackend, default_device};
use clap::Parser;
use std::{path::PathBuf, time::Duration};

#[derive(Parser)]
#[command(name = "atari_demo")]
#[command(version, about = "Watch a trained agent play an Atari-style game")]
struct Cli {
    /// Environment name, e.g. Breakout-v4 or Catch-v0
    env_name: String,

    /// Weight file of the trained agent
    agent_path: PathBuf,

    /// Probability of taking a random action at each step
    #[arg(default_value = "0", value_parser = parse_epsilon)]
    epsilon: f64,

    /// Network configuration file name
    #[arg(default_value = "net.config")]
    config_filename: String,

    /// Directory holding the configuration files
    #[arg(long, default_value = "configs")]
    config_dir: PathBuf,

    /// Play without drawing to the terminal
    #[arg(long)]
    headless: bool,

    /// Pause after every step, in milliseconds
    #[arg(long, default_value = "10")]
    step_delay_ms: u64,

    /// Seed for the game and the agent's exploration
    #[arg(long)]
    seed: Option<u64>,
}

fn parse_epsilon(value: &str) -> Result<f64, String> {
    let epsilon: f64 = value
        .parse()
        .map_err(|_| format!("`{}` is not a number", value))?;
    if (0.0..=1.0).contains(&epsilon) {
        Ok(epsilon)
    } else {
        Err(format!("epsilon must be in [0, 1], got {}", epsilon))
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let conf_path = cli.config_dir.join(&cli.config_filename);
    let device = default_device();

    let render_mode = if cli.headless {
        RenderMode::Headless
    } else {
        RenderMode::Human
    };
    let mut demo = AtariDemo::<InferenceBackend, _>::new(&cli.env_name, &conf_path, &device)?
        .with_render_mode(render_mode)
        .with_step_delay(Duration::from_millis(cli.step_delay_ms));
    if let Some(seed) = cli.seed {
        demo = demo.with_seed(seed);
        demo.env_mut().seed(seed);
    }

    demo.import_weights(&cli.agent_path)
        .with_context(|| format!("Failed to import agent {:?}", cli.agent_path))?;
    demo.run(cli.epsilon)?;

    Ok(())
}
