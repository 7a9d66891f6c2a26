//! Playback of a trained agent
//!
//! Loads a network configuration, builds the evaluation environment and a
//! matching [`AtariNet`], installs trained weights and plays one episode
//! while rendering it for a human observer.
//!
//! # Example
//!
//! ```rust,ignore
//! use atari_demo::modes::AtariDemo;
//! use atari_demo::net::{default_device, InferenceBackend};
//! use std::path::Path;
//!
//! let device = default_device();
//! let mut demo = AtariDemo::<InferenceBackend, _>::new(
//!     "Breakout-v4",
//!     Path::new("configs/net.config"),
//!     &device,
//! )?;
//! demo.import_weights(Path::new("agents/breakout.json"))?;
//! demo.run(0.0)?;
//! ```

use anyhow::{Context, Result, anyhow};
use burn::tensor::backend::Backend;
use log::{debug, info};
use std::{path::Path, thread, time::Duration};

use crate::env::{AtariEnvironment, Environment, RenderMode, suite};
use crate::net::{AtariNet, NetConfig, WeightBounds, read_weight_file};

/// Pause after every rendered step so a human can follow the game
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(10);

/// Driver owning one environment and the agent playing it
pub struct AtariDemo<B: Backend, E: Environment<B>> {
    env: E,
    agent: AtariNet<B>,
    net_conf: NetConfig,
    render_mode: RenderMode,
    step_delay: Duration,
}

impl<B: Backend> AtariDemo<B, AtariEnvironment<B>> {
    /// Build the demo for a named environment
    ///
    /// # Arguments
    ///
    /// * `env_name` - Environment name, e.g. `Breakout-v4`
    /// * `conf_path` - Path to the JSON network configuration
    /// * `device` - Device for inference
    pub fn new(env_name: &str, conf_path: &Path, device: &B::Device) -> Result<Self> {
        let net_conf = NetConfig::from_file(conf_path)
            .with_context(|| format!("Failed to load network config {:?}", conf_path))?;
        let env = suite::load::<B>(env_name, true, device)
            .with_context(|| format!("Failed to load environment {}", env_name))?;

        Self::with_environment(env, net_conf, device)
    }
}

impl<B: Backend, E: Environment<B>> AtariDemo<B, E> {
    /// Build the demo around an existing environment
    ///
    /// The network input is the environment's observation shape and its
    /// output width the number of discrete actions.
    pub fn with_environment(env: E, net_conf: NetConfig, device: &B::Device) -> Result<Self> {
        let observation_spec = env.observation_spec();
        let obs_shape: [usize; 3] = observation_spec
            .shape
            .as_slice()
            .try_into()
            .map_err(|_| {
                anyhow!(
                    "Expected a [height, width, channels] observation, got shape {:?}",
                    observation_spec.shape
                )
            })?;

        let action_spec = env.action_spec();
        let action_shape = action_spec.num_values();

        let agent = AtariNet::new(
            obs_shape,
            action_shape,
            &net_conf,
            WeightBounds::default(),
            device,
        )
        .context("Failed to build agent network")?;

        debug!(
            "demo ready: observation {:?}, actions {}..={}",
            obs_shape, action_spec.minimum, action_spec.maximum
        );

        Ok(Self {
            env,
            agent,
            net_conf,
            render_mode: RenderMode::Human,
            step_delay: DEFAULT_STEP_DELAY,
        })
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    pub fn with_render_mode(mut self, render_mode: RenderMode) -> Self {
        self.render_mode = render_mode;
        self
    }

    /// Seed the agent's exploration
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.agent = self.agent.with_seed(seed);
        self
    }

    pub fn agent(&self) -> &AtariNet<B> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut AtariNet<B> {
        &mut self.agent
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn net_conf(&self) -> &NetConfig {
        &self.net_conf
    }

    /// Install the weights stored in `agent_path`
    pub fn import_weights(&mut self, agent_path: &Path) -> Result<()> {
        let weights = read_weight_file(agent_path)?;
        let parameters = weights.parameter_count();
        self.agent
            .set_weights(weights)
            .with_context(|| format!("Failed to install weights from {:?}", agent_path))?;

        println!("{}", "=".repeat(60));
        println!("Loaded Agent");
        println!("{}", "=".repeat(60));
        println!("Weights: {:?}", agent_path);
        println!("Parameters: {}", parameters);
        println!("Observation shape: {:?}", self.agent.input_shape());
        println!("Actions: {}", self.agent.action_shape());
        println!("{}", "=".repeat(60));
        println!();

        Ok(())
    }

    /// Play one episode and return its score
    ///
    /// `epsilon` is the probability of a uniformly random action at each
    /// step; `0.0` plays fully greedy.
    pub fn run(&mut self, epsilon: f64) -> Result<f32> {
        let mut time_step = self.env.reset().context("Failed to reset environment")?;
        let mut score = 0.0;

        while !time_step.is_last() {
            let action = self.agent.action(time_step.observation, epsilon)?;
            time_step = self.env.step(action).context("Failed to step environment")?;
            score += time_step.reward;

            self.env
                .render(self.render_mode)
                .context("Failed to render environment")?;
            if !self.step_delay.is_zero() {
                thread::sleep(self.step_delay);
            }
        }

        self.env.close().context("Failed to close environment")?;
        info!("episode finished with score {:.2}", score);
        println!("{}", format_score(score));

        Ok(score)
    }
}

/// Final score report, two decimals
pub fn format_score(score: f32) -> String {
    format!("\nThe agent scored {:.2}\n", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{ArraySpec, BoundedArraySpec, StepType, TimeStep};
    use crate::net::{
        Activation, ConvLayerParams, InferenceBackend, default_device, write_weight_file,
    };
    use anyhow::bail;
    use burn::tensor::Tensor;
    use tempfile::TempDir;

    type TestBackend = InferenceBackend;

    /// Environment that ends after a fixed reward sequence
    struct ScriptedEnv {
        rewards: Vec<f32>,
        steps: usize,
        renders: usize,
        closed: bool,
        actions: usize,
        device: <TestBackend as Backend>::Device,
    }

    impl ScriptedEnv {
        fn new(rewards: Vec<f32>) -> Self {
            Self {
                rewards,
                steps: 0,
                renders: 0,
                closed: false,
                actions: 3,
                device: default_device(),
            }
        }

        fn time_step(&self, step_type: StepType, reward: f32) -> TimeStep<TestBackend> {
            TimeStep {
                step_type,
                reward,
                discount: 1.0,
                observation: Tensor::ones([6, 6, 2], &self.device),
            }
        }
    }

    impl Environment<TestBackend> for ScriptedEnv {
        fn observation_spec(&self) -> ArraySpec {
            ArraySpec {
                shape: vec![6, 6, 2],
                name: "observation".to_string(),
            }
        }

        fn action_spec(&self) -> BoundedArraySpec {
            BoundedArraySpec {
                shape: vec![],
                minimum: 0,
                maximum: self.actions as i64 - 1,
                name: "action".to_string(),
            }
        }

        fn reset(&mut self) -> Result<TimeStep<TestBackend>> {
            self.steps = 0;
            Ok(self.time_step(StepType::First, 0.0))
        }

        fn step(&mut self, action: usize) -> Result<TimeStep<TestBackend>> {
            if action >= self.actions {
                bail!("invalid action {}", action);
            }
            let reward = self.rewards[self.steps];
            self.steps += 1;
            let step_type = if self.steps == self.rewards.len() {
                StepType::Last
            } else {
                StepType::Mid
            };
            Ok(self.time_step(step_type, reward))
        }

        fn render(&mut self, _mode: RenderMode) -> Result<()> {
            self.renders += 1;
            Ok(())
        }

        fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    fn small_config() -> NetConfig {
        NetConfig {
            conv_layer_params: vec![ConvLayerParams(4, 3, 1)],
            conv_activation: Activation::Relu,
            fc_layer_params: vec![8],
            fc_activation: Activation::Relu,
        }
    }

    fn scripted_demo(rewards: Vec<f32>) -> AtariDemo<TestBackend, ScriptedEnv> {
        AtariDemo::with_environment(ScriptedEnv::new(rewards), small_config(), &default_device())
            .unwrap()
            .with_step_delay(Duration::ZERO)
            .with_render_mode(RenderMode::Headless)
            .with_seed(3)
    }

    #[test]
    fn test_shapes_from_specs() {
        let demo = scripted_demo(vec![0.0]);
        assert_eq!(demo.agent().input_shape(), [6, 6, 2]);
        assert_eq!(demo.agent().action_shape(), 3);
        assert_eq!(demo.net_conf(), &small_config());
    }

    #[test]
    fn test_three_step_episode_scores_three() {
        crate::logging::init_test_logging();
        let mut demo = scripted_demo(vec![1.0, 0.0, 2.0]);
        let score = demo.run(0.0).unwrap();

        assert_eq!(score, 3.0);
        assert_eq!(format_score(score), "\nThe agent scored 3.00\n");
        assert_eq!(demo.env().steps, 3);
        assert_eq!(demo.env().renders, 3);
        assert!(demo.env().closed);
    }

    #[test]
    fn test_random_actions_stay_in_action_space() {
        let mut demo = scripted_demo(vec![0.5; 50]);
        let score = demo.run(1.0).unwrap();
        assert_eq!(score, 25.0);
    }

    #[test]
    fn test_format_score_rounds() {
        assert_eq!(format_score(-1.0), "\nThe agent scored -1.00\n");
        assert_eq!(format_score(12.345), "\nThe agent scored 12.35\n");
    }

    #[test]
    fn test_rejects_non_image_observations() {
        struct FlatEnv(ScriptedEnv);

        impl Environment<TestBackend> for FlatEnv {
            fn observation_spec(&self) -> ArraySpec {
                ArraySpec {
                    shape: vec![128],
                    name: "ram".to_string(),
                }
            }
            fn action_spec(&self) -> BoundedArraySpec {
                self.0.action_spec()
            }
            fn reset(&mut self) -> Result<TimeStep<TestBackend>> {
                self.0.reset()
            }
            fn step(&mut self, action: usize) -> Result<TimeStep<TestBackend>> {
                self.0.step(action)
            }
            fn render(&mut self, mode: RenderMode) -> Result<()> {
                self.0.render(mode)
            }
            fn close(&mut self) -> Result<()> {
                self.0.close()
            }
        }

        let result = AtariDemo::with_environment(
            FlatEnv(ScriptedEnv::new(vec![0.0])),
            small_config(),
            &default_device(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_import_weights_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let agent_path = temp_dir.path().join("agents").join("agent.json");

        let source = scripted_demo(vec![0.0]);
        let weights = source.agent().get_weights().unwrap();
        write_weight_file(&agent_path, &weights).unwrap();

        let mut demo = scripted_demo(vec![0.0]);
        assert_ne!(demo.agent().get_weights().unwrap(), weights);
        demo.import_weights(&agent_path).unwrap();
        assert_eq!(demo.agent().get_weights().unwrap(), weights);
    }

    #[test]
    fn test_import_rejects_foreign_topology() {
        let temp_dir = TempDir::new().unwrap();
        let agent_path = temp_dir.path().join("agent.json");

        let other = AtariNet::<TestBackend>::new(
            [6, 6, 2],
            5,
            &small_config(),
            WeightBounds::default(),
            &default_device(),
        )
        .unwrap();
        write_weight_file(&agent_path, &other.get_weights().unwrap()).unwrap();

        let mut demo = scripted_demo(vec![0.0]);
        let before = demo.agent().get_weights().unwrap();
        assert!(demo.import_weights(&agent_path).is_err());
        assert_eq!(demo.agent().get_weights().unwrap(), before);
    }

    #[test]
    fn test_missing_weight_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut demo = scripted_demo(vec![0.0]);
        assert!(demo.import_weights(&temp_dir.path().join("none.json")).is_err());
    }

    #[test]
    fn test_missing_config_reported() {
        let temp_dir = TempDir::new().unwrap();
        let conf_path = temp_dir.path().join("net.config");

        let result = AtariDemo::<TestBackend, _>::new("Catch-v0", &conf_path, &default_device());
        let Err(err) = result else {
            panic!("a missing config must fail");
        };
        assert!(format!("{:#}", err).contains("The config file specified does not exist"));
    }

    #[test]
    fn test_new_builds_catch_demo() {
        let temp_dir = TempDir::new().unwrap();
        let conf_path = temp_dir.path().join("net.config");
        std::fs::write(
            &conf_path,
            r#"{
                "conv_layer_params": [[4, 8, 4], [8, 4, 2]],
                "conv_activation": "relu",
                "fc_layer_params": [16],
                "fc_activation": "relu"
            }"#,
        )
        .unwrap();

        let demo = AtariDemo::<TestBackend, _>::new("Catch-v0", &conf_path, &default_device())
            .unwrap();
        assert_eq!(demo.agent().input_shape(), [84, 84, 4]);
        assert_eq!(demo.agent().action_shape(), 3);
        assert!(demo.env().is_eval());
    }

    #[test]
    fn test_greedy_headless_catch_episode() {
        let temp_dir = TempDir::new().unwrap();
        let conf_path = temp_dir.path().join("net.config");
        std::fs::write(
            &conf_path,
            r#"{
                "conv_layer_params": [[2, 8, 4]],
                "conv_activation": "relu",
                "fc_layer_params": [],
                "fc_activation": "linear"
            }"#,
        )
        .unwrap();

        let mut demo = AtariDemo::<TestBackend, _>::new("Catch", &conf_path, &default_device())
            .unwrap()
            .with_step_delay(Duration::ZERO)
            .with_render_mode(RenderMode::Headless);

        let score = demo.run(0.0).unwrap();
        assert!((-3.0..=20.0).contains(&score));
        assert!(demo.env().game().game_over());
    }
}
