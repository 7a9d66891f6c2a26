//! Error type shared by the network, weight and environment modules

use thiserror::Error;

/// Errors raised while building networks, moving weights around or
/// resolving environments
#[derive(Debug, Error)]
pub enum AtariError {
    /// Missing or malformed configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Weight bounds that cannot be used for initialization or clamping
    #[error("invalid weight bounds: {0}")]
    Bounds(String),

    /// Layer parameters do not fit the observation shape
    #[error("invalid network topology: {0}")]
    Topology(String),

    /// Wrong number of weight arrays for this network
    #[error("expected {expected} weight arrays, got {got}")]
    WeightCount { expected: usize, got: usize },

    /// A weight array whose shape disagrees with the layer it is assigned to
    #[error("weight array {index} has shape {got:?}, expected {expected:?}")]
    WeightShape {
        index: usize,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// A weight file that does not decode into rectangular numeric arrays
    #[error("malformed weight data: {0}")]
    WeightFormat(String),

    /// No built-in game matches the requested environment name
    #[error("unknown environment: {0}")]
    UnknownEnvironment(String),

    /// Arguments to a generation operator that do not fit the population
    #[error("evolution error: {0}")]
    Evolution(String),

    /// Tensor data could not be converted to plain floats
    #[error("tensor data conversion failed: {0}")]
    TensorData(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type AtariResult<T> = Result<T, AtariError>;
