//! Seeded map generation
//!
//! Planets are scattered in one sector of the unit disk, the sector is
//! copied around the circle for rotational symmetry, everything is moved
//! into the unit square, and planets crowding an earlier one are dropped.

use std::f64::consts::TAU;

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{PlanetWarsError, Result};
use crate::world::{PlanetRecord, WorldDescription};

/// Parameters for one generated map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapGenConfig {
    /// Planets scattered in the first sector before copying
    pub planets_per_sector: usize,
    /// Rotational symmetry order (1 = no symmetry)
    pub sectors: u32,
    /// Closest two planets may be, in map units
    pub min_distance: f64,
    /// Inclusive growth range
    pub growth: (u32, u32),
    /// Inclusive starting garrison range
    pub ships: (u32, u32),
}

impl Default for MapGenConfig {
    fn default() -> Self {
        Self {
            planets_per_sector: 12,
            sectors: 2,
            min_distance: 0.15,
            growth: (0, 8),
            ships: (1, 1000),
        }
    }
}

impl MapGenConfig {
    pub fn validate(&self) -> Result<()> {
        if self.sectors == 0 {
            return Err(PlanetWarsError::InvalidConfig("sectors must be at least 1".into()));
        }
        if self.planets_per_sector == 0 {
            return Err(PlanetWarsError::InvalidConfig(
                "planets_per_sector must be at least 1".into(),
            ));
        }
        if !(self.min_distance >= 0.0) {
            return Err(PlanetWarsError::InvalidConfig("min_distance must be non-negative".into()));
        }
        if self.growth.0 > self.growth.1 || self.ships.0 > self.ships.1 {
            return Err(PlanetWarsError::InvalidConfig("empty growth or ships range".into()));
        }
        Ok(())
    }
}

/// Generates maps from a seed
pub struct MapGenerator {
    config: MapGenConfig,
    rng: ChaCha8Rng,
}

impl MapGenerator {
    pub fn new(config: MapGenConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &MapGenConfig {
        &self.config
    }

    /// Produce the next map; successive calls give different maps
    pub fn generate(&mut self) -> WorldDescription {
        let sector_angle = TAU / f64::from(self.config.sectors);
        let seeds = self.scatter(sector_angle);

        let mut candidates = Vec::with_capacity(seeds.len() * self.config.sectors as usize);
        for sector in 0..self.config.sectors {
            let rotation = DVec2::from_angle(sector_angle * f64::from(sector));
            for (offset, growth, ships) in &seeds {
                let rotated = rotation.rotate(*offset);
                let scaled = (rotated + DVec2::ONE) / 2.0;
                candidates.push((scaled, *growth, *ships));
            }
        }

        let planets = cull(candidates, self.config.min_distance);
        tracing::debug!(
            planets = planets.len(),
            sectors = self.config.sectors,
            "generated map"
        );

        WorldDescription {
            planets,
            ..Default::default()
        }
    }

    /// Random planets in the first sector of the unit disk
    fn scatter(&mut self, sector_angle: f64) -> Vec<(DVec2, u32, u32)> {
        (0..self.config.planets_per_sector)
            .map(|_| {
                let radius: f64 = self.rng.gen_range(0.0..=1.0);
                let angle: f64 = self.rng.gen_range(0.0..sector_angle);
                let growth = self.rng.gen_range(self.config.growth.0..=self.config.growth.1);
                let ships = self.rng.gen_range(self.config.ships.0..=self.config.ships.1);
                (DVec2::from_angle(angle) * radius, growth, ships)
            })
            .collect()
    }
}

/// Keep planets in order, skipping any closer than `min_distance` to a kept one
fn cull(candidates: Vec<(DVec2, u32, u32)>, min_distance: f64) -> Vec<PlanetRecord> {
    let min_sq = min_distance * min_distance;
    let mut kept: Vec<DVec2> = Vec::new();
    let mut planets = Vec::new();

    for (position, growth, ships) in candidates {
        if kept.iter().any(|other| other.distance_squared(position) < min_sq) {
            continue;
        }
        kept.push(position);
        planets.push(
            PlanetRecord::new(position.x, position.y)
                .with_growth(growth)
                .with_ships(ships),
        );
    }
    planets
}
