use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use fogwar_config::{CliArgs, Config};
use fogwar_core::{FOG_OPACITY_KEY, FogError};
use tracing::{error, info};

mod sim;

use sim::Simulation;

/// Runs the simulation at `tick_rate` for `ticks` steps, or forever when zero.
fn run(config: &Config) -> Result<(), FogError> {
    let mut sim = Simulation::new(config)?;

    let rate = config.simulation.tick_rate;
    let total = config.simulation.ticks;
    let report_interval = config.debug.report_interval;
    let dt = 1.0 / rate as f32;
    let tick_duration = Duration::from_secs_f64(1.0 / f64::from(rate));

    info!(
        fog_opacity = sim.volume().get(FOG_OPACITY_KEY).unwrap_or(0.0),
        rate,
        ticks = total,
        "Running fog simulation{}",
        if total == 0 { " until interrupted" } else { "" }
    );

    let started = Instant::now();
    let mut next_tick = started;
    while total == 0 || sim.ticks() < total {
        let stats = sim.step(dt)?;

        if report_interval > 0 && sim.ticks() % report_interval == 0 {
            let census = sim.census();
            info!(
                tick = sim.ticks(),
                visible = census.visible,
                fading = census.fading,
                fogged = census.fogged,
                culled = stats.culled,
                written = stats.written,
                unchanged = stats.unchanged,
                "Fog report"
            );
        }

        // Fixed rate: sleep off whatever is left of this tick's slot.
        next_tick += tick_duration;
        let now = Instant::now();
        if next_tick > now {
            std::thread::sleep(next_tick - now);
        } else {
            next_tick = now;
        }
    }

    let census = sim.census();
    info!(
        ticks = sim.ticks(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        material_writes = sim.material_writes(),
        detectors = sim.fog().detectors().len(),
        snapshot_overflow = sim.fog().snapshot().overflow(),
        visible = census.visible,
        fading = census.fading,
        fogged = census.fogged,
        "Simulation finished"
    );
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| {
        Config::default_dir().unwrap_or_else(|e| {
            eprintln!("{e}, using ./fogwar");
            PathBuf::from("fogwar")
        })
    });

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    let config = config.sanitized();

    let log_dir = config_dir.join("logs");
    fogwar_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config) {
        error!("Fog simulation failed: {e}");
        std::process::exit(1);
    }
}
