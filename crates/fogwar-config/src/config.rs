//! Fog, simulation and debug settings persisted as `config.ron`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Fog rendering settings.
    pub fog: FogConfig,
    /// Headless simulation settings.
    pub simulation: SimulationConfig,
    /// Logging and reporting.
    pub debug: DebugConfig,
}

/// Fog rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FogConfig {
    /// Opacity of the fog volume (0.0 - 1.0), applied once at start.
    pub fog_opacity: f32,
}

/// Headless simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks to run (0 = run until interrupted).
    pub ticks: u64,
    /// Simulation rate in Hz.
    pub tick_rate: u32,
    /// Detectors spawned at start.
    pub detectors: u32,
    /// Subscribers spawned at start.
    pub subscribers: u32,
    /// Half-width of the square spawn area in world units.
    pub arena_half_extent: f32,
    /// Wander speed in world units per second.
    pub wander_speed: f32,
    /// RNG seed for spawn positions and wander.
    pub seed: u64,
}

/// Logging and reporting settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Ticks between fog summary log lines (0 = never).
    pub report_interval: u64,
}

// --- Default implementations ---

impl Default for FogConfig {
    fn default() -> Self {
        Self { fog_opacity: 0.8 }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            tick_rate: 60,
            detectors: 8,
            subscribers: 64,
            arena_half_extent: 30.0,
            wander_speed: 2.0,
            seed: 42,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            report_interval: 60,
        }
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Per-user config directory, `<platform config dir>/fogwar`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("fogwar"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Reads `config.ron` from `config_dir`, writing defaults there on first run.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Writes `config.ron` into `config_dir`, creating the directory if needed.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::write(config_dir))?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::write(&config_path))?;
        Ok(())
    }

    /// Re-reads the file; `Some` only when it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents =
            std::fs::read_to_string(&config_path).map_err(ConfigError::read(&config_path))?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Clamps values the runtime cannot use into range.
    pub fn sanitized(mut self) -> Self {
        self.fog.fog_opacity = self.fog.fog_opacity.clamp(0.0, 1.0);
        self.simulation.tick_rate = self.simulation.tick_rate.max(1);
        self.simulation.arena_half_extent = self.simulation.arena_half_extent.abs();
        self.simulation.wander_speed = self.simulation.wander_speed.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(2))
                .unwrap();
        assert!(ron_str.contains("fog_opacity: 0.8"));
        assert!(ron_str.contains("tick_rate: 60"));
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_field_uses_default() {
        // Only the fog section, and only part of the simulation section.
        let ron_str = "(fog: (fog_opacity: 0.5), simulation: (detectors: 3))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.fog.fog_opacity, 0.5);
        assert_eq!(config.simulation.detectors, 3);
        assert_eq!(config.simulation.subscribers, 64);
        assert_eq!(config.debug, DebugConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let ron_str = "(future_setting: true)";
        let result: Result<Config, _> = ron::from_str(ron_str);
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.fog.fog_opacity = 0.35;
        config.simulation.seed = 7;

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, Config::default());
        assert!(dir.path().join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.fog.fog_opacity = 0.25;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.unwrap().fog.fog_opacity, 0.25);
    }

    #[test]
    fn test_reload_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ron_produces_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let result = Config::load_or_create(dir.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_sanitized_clamps_out_of_range_values() {
        let mut config = Config::default();
        config.fog.fog_opacity = 1.7;
        config.simulation.tick_rate = 0;
        config.simulation.arena_half_extent = -10.0;
        config.simulation.wander_speed = -1.0;

        let config = config.sanitized();
        assert_eq!(config.fog.fog_opacity, 1.0);
        assert_eq!(config.simulation.tick_rate, 1);
        assert_eq!(config.simulation.arena_half_extent, 10.0);
        assert_eq!(config.simulation.wander_speed, 0.0);
    }
}
