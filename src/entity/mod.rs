//! Game entities for the PlanetWars world
//!
//! Planets and fleets both carry ships, an owner and a position. The shared
//! state lives in [`EntityState`]; the [`Entity`] trait provides distance,
//! ship accounting and vision queries on top of it, and each variant supplies
//! its own `vision_range` and `update`.

pub mod fleet;
pub mod planet;

pub use fleet::Fleet;
pub use planet::Planet;

use crate::core::error::{PlanetWarsError, Result};
use crate::core::types::{EntityId, PlayerId, Position, Tick};

/// Serialized coordinates are multiplied by this to get world units
pub const SCALE_FACTOR: f64 = 1000.0;

/// World units a fleet travels per tick
pub const FLEET_SPEED: f64 = 20.0;

/// Planet radius is `(growth + 1) * PLANET_RADIUS_FACTOR`
pub const PLANET_RADIUS_FACTOR: f64 = 12.0;

/// Planet vision: base + per growth point + per ship
pub const PLANET_VISION_BASE: f64 = 100.0;
pub const PLANET_VISION_PER_GROWTH: f64 = 50.0;
pub const PLANET_VISION_PER_SHIP: f64 = 1.0;

/// Fleet vision: base + per ship. Fleets see less than planets.
pub const FLEET_VISION_BASE: f64 = 50.0;
pub const FLEET_VISION_PER_SHIP: f64 = 2.5;

/// State shared by every entity in the world
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub id: EntityId,
    /// World units (already scaled)
    pub position: Position,
    pub ships: u32,
    pub owner: PlayerId,
    /// Ticks since the viewing player last observed this entity (0 = visible)
    pub vision_age: Tick,
}

impl EntityState {
    pub fn new(id: EntityId, position: Position, owner: PlayerId, ships: u32) -> Self {
        Self {
            id,
            position,
            ships,
            owner,
            vision_age: 0,
        }
    }
}

/// Capability shared by planets and fleets
pub trait Entity {
    fn state(&self) -> &EntityState;

    fn state_mut(&mut self) -> &mut EntityState;

    /// Radius (world units) inside which this entity sees other entities
    fn vision_range(&self) -> f64;

    /// Advance this entity by one tick
    fn update(&mut self) -> Result<()>;

    fn id(&self) -> &EntityId {
        &self.state().id
    }

    fn owner(&self) -> &PlayerId {
        &self.state().owner
    }

    fn ships(&self) -> u32 {
        self.state().ships
    }

    fn position(&self) -> Position {
        self.state().position
    }

    fn vision_age(&self) -> Tick {
        self.state().vision_age
    }

    fn is_in_vision(&self) -> bool {
        self.state().vision_age == 0
    }

    fn is_neutral(&self) -> bool {
        self.state().owner.is_neutral()
    }

    fn is_owned_by(&self, player: &PlayerId) -> bool {
        &self.state().owner == player
    }

    /// Squared distance to another entity
    ///
    /// Squared is enough for comparisons; use `exact_distance_to` when the
    /// real length matters.
    fn distance_to<E: Entity + ?Sized>(&self, other: &E) -> f64 {
        if self.id() == other.id() {
            return 0.0;
        }
        self.distance_to_point(other.position())
    }

    /// Euclidean distance to another entity
    fn exact_distance_to<E: Entity + ?Sized>(&self, other: &E) -> f64 {
        self.distance_to(other).sqrt()
    }

    /// Squared distance to a bare point
    fn distance_to_point(&self, point: Position) -> f64 {
        self.position().distance_squared(point)
    }

    /// True if `other` lies within this entity's vision range
    fn can_see<E: Entity + ?Sized>(&self, other: &E) -> bool {
        let range = self.vision_range();
        self.distance_to(other) <= range * range
    }

    /// Ids of the given entities within vision range of this one
    fn in_range<'a, E, I>(&self, entities: I) -> Vec<EntityId>
    where
        E: Entity + 'a,
        I: IntoIterator<Item = &'a E>,
    {
        entities
            .into_iter()
            .filter(|e| self.can_see(*e))
            .map(|e| e.id().clone())
            .collect()
    }

    /// Take ships away; `ships` must be positive and no more than present
    fn remove_ships(&mut self, ships: i64) -> Result<()> {
        let state = self.state_mut();
        if ships <= 0 || ships > i64::from(state.ships) {
            return Err(PlanetWarsError::InvalidShipRemoval {
                entity: state.id.clone(),
                owner: state.owner.clone(),
                requested: ships,
                available: state.ships,
            });
        }
        state.ships -= ships as u32;
        Ok(())
    }

    fn add_ships(&mut self, ships: i64) -> Result<()> {
        let state = self.state_mut();
        if ships < 0 {
            return Err(PlanetWarsError::NegativeShipAddition {
                entity: state.id.clone(),
                requested: ships,
            });
        }
        let ships = u32::try_from(ships).unwrap_or(u32::MAX);
        state.ships = state.ships.saturating_add(ships);
        Ok(())
    }
}
