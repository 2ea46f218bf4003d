use serde::Deserialize;
use std::path::PathBuf;

use crate::tracking::DEFAULT_STEP_DEGREES;

fn default_step() -> f64 {
    DEFAULT_STEP_DEGREES
}
fn default_interval_ms() -> u64 {
    2000
}
fn default_ticks() -> u64 {
    100
}
fn default_verbose() -> bool {
    false
}

/// Settings read from `geofence.toml`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    /// JSON file holding tracked entities
    #[serde(default)]
    pub store: Option<PathBuf>,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            store: None,
            simulation: SimulationConfig::default(),
            verbose: default_verbose(),
        }
    }
}

/// Movement simulation defaults
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Maximum per-axis step in degrees
    #[serde(default = "default_step")]
    pub step: f64,
    /// Delay between ticks
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_ticks")]
    pub ticks: u64,
    /// Fixed RNG seed; random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            interval_ms: default_interval_ms(),
            ticks: default_ticks(),
            seed: None,
        }
    }
}

impl FileConfig {
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        log::debug!("Loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Store path from the config, falling back to the user data directory
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("geofence").join("entities.json"))
        .unwrap_or_else(|| PathBuf::from("geofence-entities.json"))
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("geofence.toml"));
    paths.push(PathBuf::from(".geofence.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("geofence").join("config.toml"));
        paths.push(config_dir.join("geofence.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".geofence.toml"));
        paths.push(home.join(".config").join("geofence").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.simulation.step, 0.0008);
        assert_eq!(config.simulation.interval_ms, 2000);
    }

    #[test]
    fn test_partial_simulation_table() {
        let config: FileConfig = toml::from_str(
            r#"
            store = "fences.json"
            verbose = true

            [simulation]
            seed = 42
            ticks = 10
            "#,
        )
        .unwrap();

        assert!(config.verbose);
        assert_eq!(config.store_path(), PathBuf::from("fences.json"));
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(config.simulation.ticks, 10);
        assert_eq!(config.simulation.step, DEFAULT_STEP_DEGREES);
    }

    #[test]
    fn test_config_paths_start_local() {
        let paths = get_config_paths();
        assert_eq!(paths[0], PathBuf::from("geofence.toml"));
    }
}
