//! Fog-of-war facade: a player's own copy of the world
//!
//! Each player sees what is in range of its own planets and fleets. Known
//! entities that drop out of range stay in the facade with a growing
//! `vision_age` instead of disappearing, so controllers work with aging
//! intelligence rather than none. Everything here is a value copy of the
//! canonical state; editing it changes nothing in the real game.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;

use super::order::Order;
use crate::core::types::{EntityId, PlayerId, Tick};
use crate::entity::{Entity, Fleet, Planet};

/// What one player knows about the world, plus its pending orders
#[derive(Debug, Clone)]
pub struct PlayerView {
    id: PlayerId,
    pub name: String,
    /// Tick of the most recent refresh
    pub tick: Tick,
    pub planets: BTreeMap<EntityId, Planet>,
    pub fleets: BTreeMap<EntityId, Fleet>,
    orders: Vec<Order>,
    last_seen: AHashMap<EntityId, Tick>,
    initialized: bool,
}

impl PlayerView {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tick: 0,
            planets: BTreeMap::new(),
            fleets: BTreeMap::new(),
            orders: Vec::new(),
            last_seen: AHashMap::new(),
            initialized: false,
        }
    }

    /// The player this view belongs to; fixed for the whole game
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    // === ORDERS ===

    /// Ask for a new fleet of `ships` to fly from `source` to `destination`
    ///
    /// Only a request: the returned id names the fleet if the engine accepts
    /// the order this tick.
    pub fn planet_order(
        &mut self,
        source: &EntityId,
        destination: &EntityId,
        ships: i64,
    ) -> EntityId {
        let order = Order::planet(self.id.clone(), source.clone(), destination.clone(), ships);
        let fleet_id = order.fleet_id.clone();
        self.orders.push(order);
        fleet_id
    }

    /// Ask a fleet in flight to divert `ships` to `destination`
    ///
    /// Diverting the whole fleet keeps its id; splitting mints a new one.
    pub fn fleet_order(
        &mut self,
        source: &EntityId,
        destination: &EntityId,
        ships: i64,
    ) -> EntityId {
        let whole_fleet = self
            .fleets
            .get(source)
            .is_some_and(|fleet| ships >= i64::from(fleet.ships()));
        let fleet_id = if whole_fleet { source.clone() } else { EntityId::new() };
        self.orders.push(Order::fleet(
            self.id.clone(),
            source.clone(),
            fleet_id.clone(),
            destination.clone(),
            ships,
        ));
        fleet_id
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Hand all pending orders to the engine
    pub fn take_orders(&mut self) -> Vec<Order> {
        std::mem::take(&mut self.orders)
    }

    #[cfg(test)]
    pub(crate) fn push_order(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub(crate) fn truncate_orders(&mut self, len: usize) {
        self.orders.truncate(len);
    }

    /// Debug line from a controller, tagged with this player
    pub fn log(&self, message: &str) {
        tracing::debug!(player = %self.name, tick = self.tick, "{}", message);
    }

    // === QUERIES ===

    pub fn my_planets(&self) -> Vec<&Planet> {
        self.planets.values().filter(|p| p.is_owned_by(&self.id)).collect()
    }

    pub fn enemy_planets(&self) -> Vec<&Planet> {
        self.planets
            .values()
            .filter(|p| !p.is_neutral() && !p.is_owned_by(&self.id))
            .collect()
    }

    pub fn not_my_planets(&self) -> Vec<&Planet> {
        self.planets.values().filter(|p| !p.is_owned_by(&self.id)).collect()
    }

    pub fn neutral_planets(&self) -> Vec<&Planet> {
        self.planets.values().filter(|p| p.is_neutral()).collect()
    }

    pub fn my_fleets(&self) -> Vec<&Fleet> {
        self.fleets.values().filter(|f| f.is_owned_by(&self.id)).collect()
    }

    pub fn enemy_fleets(&self) -> Vec<&Fleet> {
        self.fleets.values().filter(|f| !f.is_owned_by(&self.id)).collect()
    }

    /// Total ships this player can currently account for
    pub fn my_ship_count(&self) -> u64 {
        let on_planets: u64 = self.my_planets().iter().map(|p| u64::from(p.ships())).sum();
        let in_flight: u64 = self.my_fleets().iter().map(|f| u64::from(f.ships())).sum();
        on_planets + in_flight
    }

    // === REFRESH ===

    /// Rebuild the facade from canonical state at `tick`
    ///
    /// The first refresh copies every planet (start-of-game knowledge).
    /// Calling this twice for the same tick gives the same facade.
    pub fn refresh(
        &mut self,
        tick: Tick,
        planets: &BTreeMap<EntityId, Planet>,
        fleets: &BTreeMap<EntityId, Fleet>,
        stale_fleet_ticks: Tick,
    ) {
        self.tick = tick;

        if !self.initialized {
            self.planets = planets.clone();
            self.fleets.clear();
            for planet in self.planets.values_mut() {
                planet.state.vision_age = 0;
                self.last_seen.insert(planet.id().clone(), tick);
            }
            self.initialized = true;
        }

        let (seen_planets, seen_fleets) = visible_ids(&self.id, planets, fleets);

        // Own fleets that arrived or were merged away are known to be gone
        let me = self.id.clone();
        let last_seen = &mut self.last_seen;
        self.fleets.retain(|id, fleet| {
            let keep = !fleet.is_owned_by(&me) || fleets.contains_key(id);
            if !keep {
                last_seen.remove(id);
            }
            keep
        });

        for id in &seen_planets {
            if let Some(planet) = planets.get(id) {
                let mut copy = planet.clone();
                copy.state.vision_age = 0;
                self.planets.insert(id.clone(), copy);
                self.last_seen.insert(id.clone(), tick);
            }
        }

        for id in &seen_fleets {
            if let Some(fleet) = fleets.get(id) {
                let mut copy = fleet.clone();
                copy.state.vision_age = 0;
                self.fleets.insert(id.clone(), copy);
                self.last_seen.insert(id.clone(), tick);
            }
        }

        for (id, known) in self.planets.iter_mut() {
            if seen_planets.contains(id) {
                continue;
            }
            // A planet we thought was ours but isn't: the loss is noticed at once
            if known.is_owned_by(&me) {
                if let Some(actual) = planets.get(id) {
                    *known = actual.clone();
                    known.state.vision_age = 0;
                    self.last_seen.insert(id.clone(), tick);
                    continue;
                }
            }
            let last = self.last_seen.get(id).copied().unwrap_or(tick);
            known.state.vision_age = tick.saturating_sub(last);
        }

        let mut forgotten = Vec::new();
        for (id, known) in self.fleets.iter_mut() {
            if seen_fleets.contains(id) {
                continue;
            }
            let last = self.last_seen.get(id).copied().unwrap_or(tick);
            known.state.vision_age = tick.saturating_sub(last);
            if known.state.vision_age > stale_fleet_ticks {
                forgotten.push(id.clone());
            }
        }
        for id in forgotten {
            self.fleets.remove(&id);
            self.last_seen.remove(&id);
        }
    }
}

/// Ids of every planet and fleet `player` can currently see
///
/// Own entities are always included; others when inside the vision range of
/// at least one own entity.
fn visible_ids(
    player: &PlayerId,
    planets: &BTreeMap<EntityId, Planet>,
    fleets: &BTreeMap<EntityId, Fleet>,
) -> (BTreeSet<EntityId>, BTreeSet<EntityId>) {
    let mut seen_planets = BTreeSet::new();
    let mut seen_fleets = BTreeSet::new();

    let own_planets = planets.values().filter(|p| p.is_owned_by(player));
    let own_fleets = fleets.values().filter(|f| f.is_owned_by(player));

    for planet in own_planets.clone() {
        seen_planets.insert(planet.id().clone());
    }
    for fleet in own_fleets.clone() {
        seen_fleets.insert(fleet.id().clone());
    }

    let foreign_planets: Vec<&Planet> =
        planets.values().filter(|p| !p.is_owned_by(player)).collect();
    let foreign_fleets: Vec<&Fleet> = fleets.values().filter(|f| !f.is_owned_by(player)).collect();

    for observer in own_planets {
        seen_planets.extend(observer.in_range(foreign_planets.iter().copied()));
        seen_fleets.extend(observer.in_range(foreign_fleets.iter().copied()));
    }
    for observer in own_fleets {
        seen_planets.extend(observer.in_range(foreign_planets.iter().copied()));
        seen_fleets.extend(observer.in_range(foreign_fleets.iter().copied()));
    }

    (seen_planets, seen_fleets)
}
