//! Planets: persistent, re-ownable ship producers

use super::{
    Entity, EntityState, PLANET_RADIUS_FACTOR, PLANET_VISION_BASE, PLANET_VISION_PER_GROWTH,
    PLANET_VISION_PER_SHIP,
};
use crate::core::error::Result;
use crate::core::types::{EntityId, PlayerId, Position};

/// A planet in the game world
///
/// Owned planets grow `growth` ships every tick. Planets are never destroyed,
/// only captured.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub state: EntityState,
    pub growth: u32,
}

impl Planet {
    pub fn new(id: EntityId, position: Position, owner: PlayerId, ships: u32, growth: u32) -> Self {
        Self {
            state: EntityState::new(id, position, owner, ships),
            growth,
        }
    }

    /// Drawn radius, also the arrival radius for incoming fleets
    pub fn radius(&self) -> f64 {
        f64::from(self.growth + 1) * PLANET_RADIUS_FACTOR
    }

    /// Squared distance under which a fleet counts as arrived
    pub fn arrival_threshold_sq(&self) -> f64 {
        let radius = self.radius();
        radius * radius
    }
}

impl Entity for Planet {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn vision_range(&self) -> f64 {
        PLANET_VISION_BASE
            + PLANET_VISION_PER_GROWTH * f64::from(self.growth)
            + PLANET_VISION_PER_SHIP * f64::from(self.state.ships)
    }

    fn update(&mut self) -> Result<()> {
        if !self.is_neutral() {
            self.add_ships(i64::from(self.growth))?;
        }
        Ok(())
    }
}
