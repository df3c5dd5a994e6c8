//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Fog-of-war simulation command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "fogwar", about = "Headless fog-of-war simulation")]
pub struct CliArgs {
    /// Fog volume opacity (0.0 - 1.0).
    #[arg(long)]
    pub fog_opacity: Option<f32>,

    /// Number of ticks to simulate (0 = until interrupted).
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Simulation rate in Hz.
    #[arg(long)]
    pub tick_rate: Option<u32>,

    /// Detectors spawned at start.
    #[arg(long)]
    pub detectors: Option<u32>,

    /// Subscribers spawned at start.
    #[arg(long)]
    pub subscribers: Option<u32>,

    /// RNG seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(opacity) = args.fog_opacity {
            self.fog.fog_opacity = opacity;
        }
        if let Some(ticks) = args.ticks {
            self.simulation.ticks = ticks;
        }
        if let Some(rate) = args.tick_rate {
            self.simulation.tick_rate = rate;
        }
        if let Some(n) = args.detectors {
            self.simulation.detectors = n;
        }
        if let Some(n) = args.subscribers {
            self.simulation.subscribers = n;
        }
        if let Some(seed) = args.seed {
            self.simulation.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
