//! Backend type aliases and device management
//!
//! Networks only run inference here, on the CPU backend without autodiff.

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Backend used to run networks during playback
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
