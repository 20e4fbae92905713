//! # Demo Configuration
//!
//! ```toml
//! [world]
//! max_entities = 100000
//!
//! [simulation]
//! ticks = 600
//! seed = 7
//! enemy_grid = 5
//! burst_every = 120
//! burst_spacing = 16.0
//! ```

use std::path::Path;

use anyhow::{ensure, Context};
use serde::Deserialize;
use tessera_core::WorldConfig;

/// Top-level demo configuration.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemoConfig {
    /// Entity capacity of the simulated world.
    pub world: WorldConfig,
    /// Scene and loop parameters.
    pub simulation: SimulationConfig,
}

/// Scene and loop parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of fixed steps to run.
    pub ticks: u32,
    /// Seconds per step.
    pub dt: f32,
    /// Seed for the player's wander.
    pub seed: u64,
    /// Side length of the initial enemy grid.
    pub enemy_grid: u32,
    /// Spacing of the initial enemy grid.
    pub grid_spacing: f32,
    /// Steps between enemy bursts; 0 disables bursts.
    pub burst_every: u32,
    /// Spacing of the burst lattice covering the arena.
    pub burst_spacing: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 600,
            dt: 1.0 / 60.0,
            seed: 0,
            enemy_grid: 5,
            grid_spacing: 8.0,
            burst_every: 120,
            burst_spacing: 1280.0 / 300.0,
        }
    }
}

impl DemoConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or out-of-range values.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(source).context("invalid demo config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or does not parse.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("loading {}", path.display()))
    }

    /// Checks every value is usable.
    ///
    /// # Errors
    ///
    /// Fails on a zero capacity, a non-positive step or burst spacing.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.world.validate()?;
        let sim = &self.simulation;
        ensure!(sim.dt > 0.0, "simulation.dt must be positive");
        ensure!(sim.grid_spacing > 0.0, "simulation.grid_spacing must be positive");
        ensure!(sim.burst_spacing > 0.0, "simulation.burst_spacing must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_document() {
        let config = DemoConfig::from_toml_str("").unwrap();
        assert_eq!(config, DemoConfig::default());
        assert_eq!(config.simulation.enemy_grid, 5);
    }

    #[test]
    fn test_partial_sections() {
        let config = DemoConfig::from_toml_str(
            "[world]\nmax_entities = 64\n\n[simulation]\nticks = 10\nburst_every = 0\n",
        )
        .unwrap();
        assert_eq!(config.world.max_entities, 64);
        assert_eq!(config.simulation.ticks, 10);
        assert_eq!(config.simulation.burst_every, 0);
        assert_eq!(config.simulation.seed, 0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(DemoConfig::from_toml_str("[world]\nmax_entities = 0\n").is_err());
        assert!(DemoConfig::from_toml_str("[simulation]\ndt = 0.0\n").is_err());
        assert!(DemoConfig::from_toml_str("[simulation]\nfps = 60\n").is_err());
    }
}
