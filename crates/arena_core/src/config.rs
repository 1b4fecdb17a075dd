//! Combat configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Tunable match parameters. Defaults match tournament settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CombatConfig {
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u32,
    #[serde(default = "default_ring_start_tick")]
    pub ring_start_tick: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            ring_start_tick: default_ring_start_tick(),
        }
    }
}

impl CombatConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config = toml::from_str(&data)
            .with_context(|| format!("invalid combat config at {}", path.display()))?;
        Ok(config)
    }
}

fn default_max_ticks() -> u32 {
    60
}

fn default_ring_start_tick() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CombatConfig::default();
        assert_eq!(config.max_ticks, 60);
        assert_eq!(config.ring_start_tick, 30);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: CombatConfig = toml::from_str("max_ticks = 80\n").unwrap();
        assert_eq!(config.max_ticks, 80);
        assert_eq!(config.ring_start_tick, 30);

        let config: CombatConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_ticks, 60);
    }

    #[test]
    fn from_path_round_trip() {
        let path = std::env::temp_dir().join("arena_combat_config_test.toml");
        fs::write(&path, "max_ticks = 45\nring_start_tick = 20\n").unwrap();
        let config = CombatConfig::from_path(&path).unwrap();
        assert_eq!(config.max_ticks, 45);
        assert_eq!(config.ring_start_tick, 20);
        fs::remove_file(&path).ok();

        assert!(CombatConfig::from_path(Path::new("/nonexistent/arena.toml")).is_err());
    }
}
