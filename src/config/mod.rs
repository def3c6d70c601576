//! Runtime configuration for the command-line tools.

pub mod lane;

pub use lane::{load_config, OutputConfig, RuntimeConfig};
