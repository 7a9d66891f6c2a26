//! Network configuration and weight bounds
//!
//! The network configuration is a small JSON document describing the layer
//! stack, for example:
//!
//! ```json
//! {
//!     "conv_layer_params": [[32, 8, 4], [64, 4, 2]],
//!     "conv_activation": "relu",
//!     "fc_layer_params": [256],
//!     "fc_activation": "relu"
//! }
//! ```
//!
//! Each convolutional entry is a `(filters, kernel_size, stride)` triple.

use burn::tensor::{Tensor, activation, backend::Backend};
use log::error;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AtariError, AtariResult};

/// Parameters of one convolutional layer: `(filters, kernel_size, stride)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvLayerParams(pub usize, pub usize, pub usize);

impl ConvLayerParams {
    pub fn filters(&self) -> usize {
        self.0
    }

    pub fn kernel_size(&self) -> usize {
        self.1
    }

    pub fn stride(&self) -> usize {
        self.2
    }
}

/// Activation function identifiers, named as in Keras configurations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[serde(alias = "none", alias = "identity")]
    Linear,
    Relu,
    Sigmoid,
    Tanh,
    Gelu,
    #[serde(alias = "swish")]
    Silu,
    Elu,
}

impl Activation {
    pub fn apply<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Self::Linear => x,
            Self::Relu => activation::relu(x),
            Self::Sigmoid => activation::sigmoid(x),
            Self::Tanh => activation::tanh(x),
            Self::Gelu => activation::gelu(x),
            Self::Silu => activation::silu(x),
            // elu(x) = x for x > 0, exp(x) - 1 otherwise
            Self::Elu => activation::relu(x.clone()) + x.clamp_max(0.0).exp().sub_scalar(1.0),
        }
    }
}

/// Layer stack description for [`AtariNet`](super::AtariNet)
///
/// The output layer is not part of the configuration: it is always a linear
/// dense layer as wide as the action space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetConfig {
    /// Convolutional layers in order
    pub conv_layer_params: Vec<ConvLayerParams>,

    /// Activation applied after every convolutional layer
    pub conv_activation: Activation,

    /// Widths of the hidden fully connected layers in order
    pub fc_layer_params: Vec<usize>,

    /// Activation applied after every hidden fully connected layer
    pub fc_activation: Activation,
}

impl NetConfig {
    /// Load a configuration from a JSON file
    ///
    /// A path that does not exist is reported and rejected before any
    /// attempt to open it.
    pub fn from_file(path: &Path) -> AtariResult<Self> {
        if !path.exists() {
            error!("The config file specified does not exist: {}", path.display());
            return Err(AtariError::Config(format!(
                "The config file specified does not exist: {}",
                path.display()
            )));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse and validate a configuration document
    pub fn from_json(json: &str) -> AtariResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| AtariError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject layer parameters that cannot describe a network
    pub fn validate(&self) -> AtariResult<()> {
        for (i, conv) in self.conv_layer_params.iter().enumerate() {
            if conv.filters() == 0 || conv.kernel_size() == 0 || conv.stride() == 0 {
                return Err(AtariError::Config(format!(
                    "conv layer {} must have positive filters, kernel size and stride, got {:?}",
                    i, conv
                )));
            }
        }

        if let Some(i) = self.fc_layer_params.iter().position(|&width| width == 0) {
            return Err(AtariError::Config(format!(
                "fc layer {} must have a positive width",
                i
            )));
        }

        Ok(())
    }
}

/// Closed interval used to initialize weights, plus the amount by which
/// weights sitting exactly on the lower bound are nudged upward on import
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBounds {
    pub minval: f32,
    pub maxval: f32,
    pub val_buffer: f32,
}

impl WeightBounds {
    pub fn new(minval: f32, maxval: f32, val_buffer: f32) -> AtariResult<Self> {
        let bounds = Self {
            minval,
            maxval,
            val_buffer,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> AtariResult<()> {
        if !self.minval.is_finite() || !self.maxval.is_finite() || self.minval >= self.maxval {
            return Err(AtariError::Bounds(format!(
                "minval ({}) must be below maxval ({})",
                self.minval, self.maxval
            )));
        }

        if self.val_buffer <= 0.0 || self.val_buffer >= self.span() {
            return Err(AtariError::Bounds(format!(
                "val_buffer must be in (0, {}), got {}",
                self.span(),
                self.val_buffer
            )));
        }

        Ok(())
    }

    pub fn span(&self) -> f32 {
        self.maxval - self.minval
    }

    /// Value written in place of weights equal to `minval`
    pub fn replace_min(&self) -> f32 {
        self.minval + self.val_buffer
    }
}

impl Default for WeightBounds {
    fn default() -> Self {
        Self {
            minval: -1.0,
            maxval: 1.0,
            val_buffer: 1e-6,
        }
    }
}
