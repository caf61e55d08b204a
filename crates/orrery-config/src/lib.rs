//! Configuration system for the orrery.
//!
//! Startup settings persist to disk as RON files and can be overridden from
//! the command line via clap. Supports hot-reload detection and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, FrameConfig, LightingConfig, OrbitConfig, SimulationConfig,
};
pub use error::ConfigError;
