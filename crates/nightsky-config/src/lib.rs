//! Configuration system for the night sky viewer.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, validation of the
//! generator parameters, and forward/backward compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, NebulaConfig, ShootingStarConfig, SimulationConfig,
    StarFieldConfig, WindowConfig, MAX_TEXTURE_SIZE,
};
pub use error::ConfigError;
