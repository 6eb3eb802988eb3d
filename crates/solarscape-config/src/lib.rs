//! Configuration system for Solarscape.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, validation, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, InputConfig, MAX_SPHERE_SUBDIVISIONS, RenderConfig,
    SceneConfig, WindowConfig,
};
pub use error::ConfigError;
