pub mod viewer;

pub use viewer::{Status, Viewer, screen_lines};
