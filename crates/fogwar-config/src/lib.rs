//! Configuration for the fog-of-war runtime.
//!
//! Settings persist to disk as `config.ron` and can be overridden from the
//! command line. Missing sections and fields fall back to defaults, so older
//! files keep loading as settings are added.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE, Config, DebugConfig, FogConfig, SimulationConfig};
pub use error::ConfigError;
