//! Generation operator for evolutionary weight search
//!
//! The search loop itself (evaluation, ranking, diversity measures) lives
//! outside this crate; this module only turns a ranked population into the
//! next one.

pub mod config;
pub mod generation;

pub use config::EvoConfig;
pub use generation::AtariGen;
