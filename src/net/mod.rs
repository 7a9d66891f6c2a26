//! Convolutional agent networks
//!
//! Provides:
//! - Layer stack configuration and weight bounds
//! - The bounded-weight network with epsilon-greedy action selection
//! - Weight sets in Keras layout and their JSON weight files
//! - Backend aliases for CPU inference

pub mod atari_net;
pub mod backend;
pub mod config;
pub mod weights;

pub use atari_net::{AtariNet, argmax};
pub use backend::{InferenceBackend, default_device};
pub use config::{Activation, ConvLayerParams, NetConfig, WeightBounds};
pub use weights::{WeightArray, WeightSet, parse_weights, read_weight_file, write_weight_file};
