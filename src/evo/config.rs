use log::error;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AtariError, AtariResult};
use crate::net::WeightBounds;

/// Hyperparameters of the generation operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvoConfig {
    /// Population size
    pub n_agents: usize,

    /// Mutation rate for offspring of two parents
    pub p_mut_loc: f64,

    /// Scale of the fitness component of the mutation rate
    pub k_p_mut: f64,

    /// Lower bound of network weights
    pub net_minval: f32,

    /// Upper bound of network weights
    pub net_maxval: f32,

    /// Added to weights sitting exactly on `net_minval` when installed
    pub val_buffer: f32,
}

impl EvoConfig {
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

    pub fn from_json(json: &str) -> AtariResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| AtariError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AtariResult<()> {
        if self.n_agents == 0 {
            return Err(AtariError::Config("n_agents must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.p_mut_loc) {
            return Err(AtariError::Config(format!(
                "p_mut_loc must be a probability, got {}",
                self.p_mut_loc
            )));
        }
        if !self.k_p_mut.is_finite() || self.k_p_mut < 0.0 {
            return Err(AtariError::Config(format!(
                "k_p_mut must be non-negative, got {}",
                self.k_p_mut
            )));
        }
        self.bounds().validate()
    }

    /// Weight bounds every agent of the population is built with
    pub fn bounds(&self) -> WeightBounds {
        WeightBounds {
            minval: self.net_minval,
            maxval: self.net_maxval,
            val_buffer: self.val_buffer,
        }
    }
}

impl Default for EvoConfig {
    fn default() -> Self {
        let bounds = WeightBounds::default();
        Self {
            n_agents: 50,
            p_mut_loc: 0.01,
            k_p_mut: 0.5,
            net_minval: bounds.minval,
            net_maxval: bounds.maxval,
            val_buffer: bounds.val_buffer,
        }
    }
}
