//! Fleets: ships in transit towards a planet

use super::{Entity, EntityState, Planet, FLEET_SPEED, FLEET_VISION_BASE, FLEET_VISION_PER_SHIP};
use crate::core::error::Result;
use crate::core::types::{EntityId, PlayerId, Position};

/// A fleet in the game world
///
/// Always owned by a player. All fleets move at `FLEET_SPEED` along a
/// heading fixed when they are launched.
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    pub state: EntityState,
    pub destination: EntityId,
    /// Radians, cached at launch
    pub heading: f64,
}

impl Fleet {
    pub fn new(
        id: EntityId,
        owner: PlayerId,
        ships: u32,
        position: Position,
        destination: &Planet,
    ) -> Self {
        let delta = destination.position() - position;
        Self {
            state: EntityState::new(id, position, owner, ships),
            destination: destination.id().clone(),
            heading: delta.y.atan2(delta.x),
        }
    }

    /// Launch a fleet from the current position of `source`
    pub fn launch<E: Entity + ?Sized>(
        id: EntityId,
        owner: PlayerId,
        ships: u32,
        source: &E,
        destination: &Planet,
    ) -> Self {
        Self::new(id, owner, ships, source.position(), destination)
    }

    /// Displacement applied by one `update`
    pub fn velocity(&self) -> Position {
        Position::new(self.heading.cos(), self.heading.sin()) * FLEET_SPEED
    }

    /// True once the fleet is inside the destination's arrival radius
    pub fn has_arrived(&self, destination: &Planet) -> bool {
        self.distance_to(destination) <= destination.arrival_threshold_sq()
    }
}

impl Entity for Fleet {
    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn vision_range(&self) -> f64 {
        FLEET_VISION_BASE + FLEET_VISION_PER_SHIP * f64::from(self.state.ships)
    }

    fn update(&mut self) -> Result<()> {
        let velocity = self.velocity();
        self.state.position += velocity;
        Ok(())
    }
}
