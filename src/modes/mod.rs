pub mod demo;

pub use demo::{AtariDemo, DEFAULT_STEP_DELAY, format_score};
