//! Run configuration for a PlanetWars game
//!
//! Game-rule constants (fleet speed, vision formulas) live next to the
//! entities in `crate::entity`. This struct holds the knobs that vary per
//! run and can be loaded from a TOML file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{PlanetWarsError, Result};
use crate::core::types::Tick;

/// Configuration for a single game run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tick limit after which the game stops even with several players alive
    ///
    /// A world description carrying its own `max_ticks` overrides this.
    pub max_ticks: Tick,

    /// Wall-clock budget for one controller `update` call, in milliseconds
    ///
    /// When set, a controller that takes longer has the orders it queued
    /// during that call discarded (a forced pass). `None` disables the check.
    pub controller_budget_ms: Option<u64>,

    /// Ticks an unobserved enemy fleet stays in a player's facade
    ///
    /// Planets are never forgotten. Fleets are, because they eventually
    /// arrive somewhere and stop existing.
    pub stale_fleet_ticks: Tick,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_ticks: 10_000,
            controller_budget_ms: None,
            stale_fleet_ticks: 25,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text, filling missing fields with defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_ticks == 0 {
            return Err(PlanetWarsError::InvalidConfig(
                "max_ticks must be at least 1".into(),
            ));
        }

        if self.controller_budget_ms == Some(0) {
            return Err(PlanetWarsError::InvalidConfig(
                "controller_budget_ms must be positive when set".into(),
            ));
        }

        Ok(())
    }

    pub fn with_max_ticks(mut self, max_ticks: Tick) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn with_controller_budget_ms(mut self, budget: u64) -> Self {
        self.controller_budget_ms = Some(budget);
        self
    }
}
