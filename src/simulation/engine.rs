//! The PlanetWars game engine
//!
//! Each call to `update` advances the world by one tick:
//! controllers -> orders -> growth -> movement -> battles -> tick -> facades
//!
//! The phase order is fixed; later phases read what earlier ones wrote.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::controller::ControllerRegistry;
use crate::core::config::GameConfig;
use crate::core::error::{PlanetWarsError, Result};
use crate::core::types::{EntityId, PlayerId, Position, Tick};
use crate::entity::{Entity, Fleet, Planet, SCALE_FACTOR};
use crate::player::{Order, OrderKind, Player, PlayerView};
use crate::simulation::battle::{self, BattleOutcome};
use crate::simulation::events::{GameEvent, RejectReason};
use crate::simulation::replay::ReplayRecorder;
use crate::simulation::spawn::spawn_players;
use crate::world::{FleetRecord, PlanetRecord, PlayerRecord, RecordedOrder, WorldDescription};

/// Canonical game state plus the players acting on it
pub struct Game {
    pub planets: BTreeMap<EntityId, Planet>,
    pub fleets: BTreeMap<EntityId, Fleet>,
    pub players: BTreeMap<PlayerId, Player>,
    pub tick: Tick,
    pub max_ticks: Tick,
    /// Set when ownership changes or fleets appear/disappear; a renderer
    /// clears it once it has redrawn
    pub dirty: bool,
    config: GameConfig,
    recorded_orders: BTreeMap<Tick, Vec<Order>>,
    replay: Option<ReplayRecorder>,
}

impl Game {
    /// Build a game from a world description
    ///
    /// Player names are looked up in `registry`. Players without a planet
    /// are spawned on neutral ones, then every facade gets its first refresh.
    pub fn new(
        description: WorldDescription,
        registry: &ControllerRegistry,
        config: GameConfig,
    ) -> Result<Self> {
        config.validate()?;

        let planets = load_planets(&description.planets)?;
        let fleets = load_fleets(&description.fleets, &planets)?;

        let mut players = BTreeMap::new();
        for record in description.players.iter().flatten() {
            if record.id.is_neutral() {
                tracing::warn!(name = %record.name, "ignoring player using the neutral id");
                continue;
            }
            let controller = registry.create(&record.name)?;
            players.insert(
                record.id.clone(),
                Player::new(record.id.clone(), record.name.clone(), controller),
            );
        }

        let mut recorded_orders: BTreeMap<Tick, Vec<Order>> = BTreeMap::new();
        for recorded in &description.orders {
            if !players.contains_key(&recorded.owner) {
                return Err(PlanetWarsError::UnknownPlayer(recorded.owner.clone()));
            }
            recorded_orders
                .entry(recorded.tick)
                .or_default()
                .push(recorded.to_order());
        }

        let mut game = Self {
            planets,
            fleets,
            players,
            tick: description.tick,
            max_ticks: description.max_ticks.unwrap_or(config.max_ticks),
            dirty: true,
            config,
            recorded_orders,
            replay: None,
        };

        game.spawn_players()?;
        game.refresh_facades();

        tracing::info!(
            planets = game.planets.len(),
            fleets = game.fleets.len(),
            players = game.players.len(),
            recorded_orders = description.orders.len(),
            "game created"
        );

        Ok(game)
    }

    /// Hand any planet-less player a neutral planet
    pub fn spawn_players(&mut self) -> Result<()> {
        let ids: Vec<PlayerId> = self.players.keys().cloned().collect();
        let assigned = spawn_players(&mut self.planets, ids.iter())?;
        if !assigned.is_empty() {
            self.dirty = true;
        }
        Ok(())
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// A player's fog-of-war view
    pub fn view(&self, id: &PlayerId) -> Option<&PlayerView> {
        self.players.get(id).map(|p| &p.view)
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// True while recorded orders are still being played back
    pub fn is_replaying(&self) -> bool {
        !self.recorded_orders.is_empty()
    }

    /// Start recording a replay from the current state
    pub fn record_replay(&mut self) {
        self.replay = Some(ReplayRecorder::new(self.snapshot()));
    }

    pub fn replay(&self) -> Option<&ReplayRecorder> {
        self.replay.as_ref()
    }

    /// Stop recording and return the replay, if one was being recorded
    pub fn take_replay(&mut self) -> Option<WorldDescription> {
        self.replay.take().map(ReplayRecorder::into_description)
    }

    // === LIVENESS ===

    /// True while at least two players still own something
    pub fn is_alive(&self) -> bool {
        self.living_owners().len() > 1
    }

    /// The last player standing, once the game is over
    pub fn winner(&self) -> Option<PlayerId> {
        let owners = self.living_owners();
        if owners.len() == 1 {
            owners.into_iter().next().cloned()
        } else {
            None
        }
    }

    /// Game over or out of ticks
    pub fn is_finished(&self) -> bool {
        !self.is_alive() || self.tick >= self.max_ticks
    }

    fn living_owners(&self) -> BTreeSet<&PlayerId> {
        self.planets
            .values()
            .map(|p| p.owner())
            .chain(self.fleets.values().map(|f| f.owner()))
            .filter(|owner| !owner.is_neutral())
            .collect()
    }

    /// Ships on planets and in flight, across every owner
    pub fn total_ships(&self) -> u64 {
        let on_planets: u64 = self.planets.values().map(|p| u64::from(p.ships())).sum();
        let in_flight: u64 = self.fleets.values().map(|f| u64::from(f.ships())).sum();
        on_planets + in_flight
    }

    // === TICK ===

    /// Advance the world by exactly one tick
    ///
    /// Returns everything that happened. An `Err` means the engine broke its
    /// own ship accounting; bad orders never produce one.
    pub fn update(&mut self) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();

        // Phase 1 + 2: controllers (or the replay) issue orders, then they execute
        let orders = if self.is_replaying() {
            self.due_recorded_orders()
        } else {
            self.run_controllers(&mut events);
            self.drain_player_orders()
        };
        for order in orders {
            self.execute_order(order, &mut events)?;
        }

        // Phase 3: growth
        for planet in self.planets.values_mut() {
            planet.update()?;
        }

        // Phase 4: movement and arrivals
        let mut arrivals: BTreeMap<EntityId, Vec<EntityId>> = BTreeMap::new();
        for fleet in self.fleets.values_mut() {
            fleet.update()?;
            if let Some(destination) = self.planets.get(&fleet.destination) {
                if fleet.has_arrived(destination) {
                    arrivals
                        .entry(destination.id().clone())
                        .or_default()
                        .push(fleet.id().clone());
                }
            }
        }

        // Phase 5: battles
        for (planet_id, fleet_ids) in arrivals {
            self.resolve_arrivals(&planet_id, &fleet_ids, &mut events);
        }

        // Phase 6
        self.tick += 1;

        // Phase 7
        self.refresh_facades();

        for event in &events {
            tracing::debug!("{}", event);
        }

        Ok(events)
    }

    fn run_controllers(&mut self, events: &mut Vec<GameEvent>) {
        let budget = self.config.controller_budget_ms.map(Duration::from_millis);
        for player in self.players.values_mut() {
            if let Some(fault) = player.run_controller(budget) {
                tracing::warn!(player = %player.name, tick = self.tick, %fault, "controller fault");
                events.push(GameEvent::ControllerFault {
                    tick: self.tick,
                    player: player.id.clone(),
                    fault,
                });
            }
        }
    }

    /// Pending orders of every player, stamped with the player they came from
    fn drain_player_orders(&mut self) -> Vec<Order> {
        let mut orders = Vec::new();
        for (id, player) in self.players.iter_mut() {
            for mut order in player.view.take_orders() {
                if order.owner != *id {
                    tracing::warn!(
                        player = %id,
                        claimed = %order.owner,
                        "order claims another owner"
                    );
                    order.owner = id.clone();
                }
                orders.push(order);
            }
        }
        orders
    }

    /// Recorded orders for this tick (and any left behind from earlier ticks)
    fn due_recorded_orders(&mut self) -> Vec<Order> {
        let mut due = Vec::new();
        while let Some(entry) = self.recorded_orders.first_entry() {
            if *entry.key() > self.tick {
                break;
            }
            due.extend(entry.remove());
        }
        due
    }

    /// Validate one order and launch its fleet
    ///
    /// Problems with the order are reported as events; only a failure of the
    /// ship bookkeeping itself is an error.
    fn execute_order(&mut self, order: Order, events: &mut Vec<GameEvent>) -> Result<()> {
        let tick = self.tick;
        let reject = |order: &Order, reason: RejectReason| GameEvent::OrderRejected {
            tick,
            owner: order.owner.clone(),
            source: order.source.clone(),
            reason,
        };

        let source = match order.kind {
            OrderKind::Planet => self
                .planets
                .get(&order.source)
                .map(|p| (p.owner().clone(), p.ships(), p.position())),
            OrderKind::Fleet => self
                .fleets
                .get(&order.source)
                .map(|f| (f.owner().clone(), f.ships(), f.position())),
        };
        let Some((source_owner, available, origin)) = source else {
            events.push(reject(&order, RejectReason::UnknownSource));
            return Ok(());
        };

        let Some(destination) = self.planets.get(&order.destination) else {
            events.push(reject(&order, RejectReason::UnknownDestination));
            return Ok(());
        };

        if source_owner != order.owner {
            events.push(reject(&order, RejectReason::NotOwner { actual: source_owner }));
            return Ok(());
        }

        if order.kind == OrderKind::Planet && order.source == order.destination {
            events.push(reject(&order, RejectReason::SameSourceAndDestination));
            return Ok(());
        }

        let mut ships = order.ships;
        if ships > i64::from(available) {
            tracing::warn!(owner = %order.owner, requested = ships, available, "order clamped");
            events.push(GameEvent::OrderClamped {
                tick,
                owner: order.owner.clone(),
                source: order.source.clone(),
                requested: ships,
                available,
            });
            ships = i64::from(available);
        }
        if ships <= 0 {
            events.push(reject(&order, RejectReason::NoShips));
            return Ok(());
        }

        // The only id allowed to be reused is that of a fleet diverted whole
        let replaces_source = order.kind == OrderKind::Fleet
            && order.fleet_id == order.source
            && ships == i64::from(available);
        if self.fleets.contains_key(&order.fleet_id) && !replaces_source {
            events.push(reject(&order, RejectReason::FleetIdInUse));
            return Ok(());
        }

        let fleet = Fleet::new(
            order.fleet_id.clone(),
            order.owner.clone(),
            ships as u32,
            origin,
            destination,
        );

        let remaining = match order.kind {
            OrderKind::Planet => match self.planets.get_mut(&order.source) {
                Some(planet) => {
                    planet.remove_ships(ships)?;
                    planet.ships()
                }
                None => 0,
            },
            OrderKind::Fleet => {
                let remaining = match self.fleets.get_mut(&order.source) {
                    Some(source) => {
                        source.remove_ships(ships)?;
                        source.ships()
                    }
                    None => 0,
                };
                if remaining == 0 {
                    self.fleets.remove(&order.source);
                }
                remaining
            }
        };

        self.fleets.insert(order.fleet_id.clone(), fleet);
        self.dirty = true;

        let executed = Order { ships, ..order };
        if let Some(replay) = self.replay.as_mut() {
            replay.record(tick, &executed);
        }
        events.push(GameEvent::OrderExecuted {
            tick,
            owner: executed.owner,
            kind: executed.kind,
            source: executed.source,
            fleet: executed.fleet_id,
            ships: ships as u32,
            remaining,
            destination: executed.destination,
        });
        Ok(())
    }

    fn resolve_arrivals(
        &mut self,
        planet_id: &EntityId,
        fleet_ids: &[EntityId],
        events: &mut Vec<GameEvent>,
    ) {
        let arriving: Vec<Fleet> = fleet_ids
            .iter()
            .filter_map(|id| self.fleets.remove(id))
            .collect();
        let Some(planet) = self.planets.get_mut(planet_id) else {
            return;
        };

        let forces = battle::tally_forces(planet, &arriving);
        let outcome = battle::resolve(planet.owner(), &forces);

        planet.state.owner = outcome.owner().clone();
        planet.state.ships = outcome.ships();
        self.dirty = true;

        let tick = self.tick;
        let planet = planet_id.clone();
        events.push(match outcome {
            BattleOutcome::Reinforced { owner, ships } => GameEvent::Reinforced {
                tick,
                planet,
                owner,
                ships,
            },
            BattleOutcome::Defended {
                owner,
                ships,
                ships_lost,
            } => GameEvent::Defended {
                tick,
                planet,
                owner,
                ships,
                ships_lost,
            },
            BattleOutcome::Captured {
                previous_owner,
                owner,
                ships,
                ships_lost,
            } => {
                tracing::info!(tick, planet = %planet, owner = %owner, "planet captured");
                GameEvent::Captured {
                    tick,
                    planet,
                    previous_owner,
                    owner,
                    ships,
                    ships_lost,
                }
            }
        });
    }

    /// Re-derive every player's facade from canonical state
    pub fn refresh_facades(&mut self) {
        let stale_fleet_ticks = self.config.stale_fleet_ticks;
        for player in self.players.values_mut() {
            player
                .view
                .refresh(self.tick, &self.planets, &self.fleets, stale_fleet_ticks);
        }
    }

    // === SERIALIZATION ===

    /// Canonical state as a world description
    ///
    /// Loading the result gives an equivalent game (same ids, owners, ships
    /// and positions, pending recorded orders included).
    pub fn snapshot(&self) -> WorldDescription {
        let planets = self
            .planets
            .values()
            .map(|p| PlanetRecord {
                id: Some(p.id().clone()),
                x: p.position().x / SCALE_FACTOR,
                y: p.position().y / SCALE_FACTOR,
                owner: Some(p.owner().clone()),
                ships: Some(p.ships()),
                growth: Some(p.growth),
            })
            .collect();

        let fleets = self
            .fleets
            .values()
            .map(|f| FleetRecord {
                id: Some(f.id().clone()),
                owner: f.owner().clone(),
                ships: f.ships(),
                x: f.position().x / SCALE_FACTOR,
                y: f.position().y / SCALE_FACTOR,
                destination: f.destination.clone(),
            })
            .collect();

        let players = (!self.players.is_empty()).then(|| {
            self.players
                .values()
                .map(|p| PlayerRecord {
                    id: p.id.clone(),
                    name: p.name.clone(),
                })
                .collect()
        });

        let orders = self
            .recorded_orders
            .iter()
            .flat_map(|(tick, orders)| {
                orders
                    .iter()
                    .map(move |order| RecordedOrder::from_order(*tick, order))
            })
            .collect();

        WorldDescription {
            planets,
            fleets,
            players,
            orders,
            max_ticks: Some(self.max_ticks),
            tick: self.tick,
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("tick", &self.tick)
            .field("planets", &self.planets.len())
            .field("fleets", &self.fleets.len())
            .field("players", &self.players.values().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

fn load_planets(records: &[PlanetRecord]) -> Result<BTreeMap<EntityId, Planet>> {
    let mut planets = BTreeMap::new();
    for record in records {
        let id = record.id.clone().unwrap_or_default();
        let owner = record
            .owner
            .clone()
            .filter(|owner| !owner.as_str().is_empty())
            .unwrap_or_else(PlayerId::neutral);
        let planet = Planet::new(
            id.clone(),
            Position::new(record.x, record.y) * SCALE_FACTOR,
            owner,
            record.ships.unwrap_or(0),
            record.growth.unwrap_or(1),
        );
        if planets.insert(id.clone(), planet).is_some() {
            return Err(PlanetWarsError::DuplicateId(id));
        }
    }
    Ok(planets)
}

fn load_fleets(
    records: &[FleetRecord],
    planets: &BTreeMap<EntityId, Planet>,
) -> Result<BTreeMap<EntityId, Fleet>> {
    let mut fleets = BTreeMap::new();
    for record in records {
        let id = record.id.clone().unwrap_or_default();
        let destination = planets
            .get(&record.destination)
            .ok_or_else(|| PlanetWarsError::UnknownDestination {
                fleet: id.clone(),
                destination: record.destination.clone(),
            })?;
        if record.owner.is_neutral() {
            return Err(PlanetWarsError::NeutralFleet(id));
        }
        if record.ships == 0 {
            tracing::warn!(fleet = %id, "skipping empty fleet");
            continue;
        }
        let fleet = Fleet::new(
            id.clone(),
            record.owner.clone(),
            record.ships,
            Position::new(record.x, record.y) * SCALE_FACTOR,
            destination,
        );
        if planets.contains_key(&id) || fleets.insert(id.clone(), fleet).is_some() {
            return Err(PlanetWarsError::DuplicateId(id));
        }
    }
    Ok(fleets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(id: &str) -> PlayerId {
        PlayerId::from(id)
    }

    fn e(id: &str) -> EntityId {
        EntityId::from(id)
    }

    /// a (player 1) and b (neutral) sit 100 world units apart; player 2 holds c far away
    fn duel_world() -> WorldDescription {
        WorldDescription {
            planets: vec![
                PlanetRecord::new(0.0, 0.0).with_id("a").with_owner("1").with_ships(20),
                PlanetRecord::new(0.1, 0.0).with_id("b").with_ships(5),
                PlanetRecord::new(0.9, 0.9).with_id("c").with_owner("2").with_ships(10),
            ],
            players: Some(vec![PlayerRecord::new("1", "Idle"), PlayerRecord::new("2", "Idle")]),
            ..Default::default()
        }
    }

    fn load(description: WorldDescription) -> Result<Game> {
        Game::new(description, &ControllerRegistry::with_defaults(), GameConfig::default())
    }

    fn game(description: WorldDescription) -> Game {
        load(description).unwrap()
    }

    fn queue_planet_order(
        game: &mut Game,
        player: &str,
        source: &str,
        dest: &str,
        ships: i64,
    ) -> EntityId {
        game.players
            .get_mut(&p(player))
            .unwrap()
            .view
            .planet_order(&e(source), &e(dest), ships)
    }

    #[test]
    fn test_load_scales_positions_and_defaults() {
        let game = game(duel_world());
        let b = &game.planets[&e("b")];
        assert_eq!(b.position(), Position::new(100.0, 0.0));
        assert_eq!(b.growth, 1);
        assert!(b.is_neutral());
        assert_eq!(game.max_ticks, GameConfig::default().max_ticks);
    }

    #[test]
    fn test_fleet_captures_neutral_planet() {
        let mut game = game(duel_world());
        let fleet_id = queue_planet_order(&mut game, "1", "a", "b", 10);

        let events = game.update().unwrap();
        assert!(events
            .iter()
            .any(|ev| matches!(
                ev,
                GameEvent::OrderExecuted { fleet, ships: 10, .. } if *fleet == fleet_id
            )));
        // launched, grew, then moved once
        assert_eq!(game.planets[&e("a")].ships(), 11);
        assert_eq!(game.fleets[&fleet_id].position(), Position::new(20.0, 0.0));

        let mut captured = None;
        for _ in 0..10 {
            for event in game.update().unwrap() {
                if let GameEvent::Captured { planet, owner, ships, .. } = event {
                    captured = Some((planet, owner, ships));
                }
            }
            if captured.is_some() {
                break;
            }
        }

        assert_eq!(captured, Some((e("b"), p("1"), 5)));
        assert_eq!(game.tick, 4);
        assert!(game.fleets.is_empty());
        assert!(game.planets[&e("b")].is_owned_by(&p("1")));
    }

    #[test]
    fn test_overdrawn_order_is_clamped() {
        let mut description = duel_world();
        description.planets[0].ships = Some(10);
        let mut game = game(description);
        let fleet_id = queue_planet_order(&mut game, "1", "a", "b", 15);

        let events = game.update().unwrap();
        assert!(events.iter().any(|ev| matches!(
            ev,
            GameEvent::OrderClamped { requested: 15, available: 10, .. }
        )));
        assert_eq!(game.fleets[&fleet_id].ships(), 10);
        // emptied, then grew by one
        assert_eq!(game.planets[&e("a")].ships(), 1);
    }

    #[test]
    fn test_order_from_foreign_planet_is_discarded() {
        let mut game = game(duel_world());
        queue_planet_order(&mut game, "2", "a", "c", 5);

        let events = game.update().unwrap();
        assert!(events.iter().any(|ev| matches!(
            ev,
            GameEvent::OrderRejected {
                reason: RejectReason::NotOwner { actual },
                ..
            } if *actual == p("1")
        )));
        assert!(game.fleets.is_empty());
        assert_eq!(game.planets[&e("a")].ships(), 21);
    }

    #[test]
    fn test_unknown_destination_and_empty_orders_rejected() {
        let mut game = game(duel_world());
        queue_planet_order(&mut game, "1", "a", "nowhere", 5);
        queue_planet_order(&mut game, "1", "a", "b", 0);
        queue_planet_order(&mut game, "1", "ghost", "b", 3);

        let events = game.update().unwrap();
        let reasons: Vec<_> = events
            .iter()
            .filter_map(|ev| match ev {
                GameEvent::OrderRejected { reason, .. } => Some(reason.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            reasons,
            vec![
                RejectReason::UnknownDestination,
                RejectReason::NoShips,
                RejectReason::UnknownSource
            ]
        );
        assert!(game.fleets.is_empty());
    }

    #[test]
    fn test_whole_fleet_divert_keeps_id() {
        let mut game = game(duel_world());
        let fleet_id = queue_planet_order(&mut game, "1", "a", "b", 4);
        game.update().unwrap();

        let view = &mut game.players.get_mut(&p("1")).unwrap().view;
        let diverted = view.fleet_order(&fleet_id, &e("c"), 4);
        assert_eq!(diverted, fleet_id);
        game.update().unwrap();

        assert_eq!(game.fleets.len(), 1);
        assert_eq!(game.fleets[&fleet_id].destination, e("c"));
        assert_eq!(game.fleets[&fleet_id].ships(), 4);
    }

    #[test]
    fn test_fleet_split_leaves_remainder_in_flight() {
        let mut game = game(duel_world());
        let fleet_id = queue_planet_order(&mut game, "1", "a", "c", 10);
        game.update().unwrap();

        let view = &mut game.players.get_mut(&p("1")).unwrap().view;
        let split = view.fleet_order(&fleet_id, &e("b"), 3);
        assert_ne!(split, fleet_id);
        game.update().unwrap();

        assert_eq!(game.fleets[&fleet_id].ships(), 7);
        assert_eq!(game.fleets[&split].ships(), 3);
        assert_eq!(game.fleets[&split].destination, e("b"));
    }

    #[test]
    fn test_is_alive_needs_two_owners() {
        let mut game = game(duel_world());
        assert!(game.is_alive());
        assert_eq!(game.winner(), None);

        game.planets.get_mut(&e("c")).unwrap().state.owner = p("1");
        assert!(!game.is_alive());
        assert!(game.is_finished());
        assert_eq!(game.winner(), Some(p("1")));
    }

    #[test]
    fn test_fleet_in_flight_keeps_player_alive() {
        let mut game = game(duel_world());
        queue_planet_order(&mut game, "2", "c", "b", 10);
        game.update().unwrap();
        game.planets.get_mut(&e("c")).unwrap().state.owner = p("1");
        assert!(game.is_alive());
    }

    #[test]
    fn test_growth_skips_neutral() {
        let mut game = game(duel_world());
        game.update().unwrap();
        assert_eq!(game.planets[&e("a")].ships(), 21);
        assert_eq!(game.planets[&e("b")].ships(), 5);
        assert_eq!(game.tick, 1);
    }

    #[test]
    fn test_players_without_planets_are_spawned() {
        let description = WorldDescription {
            planets: vec![
                PlanetRecord::new(0.0, 0.0).with_id("a"),
                PlanetRecord::new(1.0, 1.0).with_id("b"),
                PlanetRecord::new(0.2, 0.2).with_id("c"),
            ],
            players: Some(vec![PlayerRecord::new("1", "Idle"), PlayerRecord::new("2", "Idle")]),
            ..Default::default()
        };
        let game = game(description);
        assert!(game.planets[&e("a")].is_owned_by(&p("1")));
        assert!(game.planets[&e("b")].is_owned_by(&p("2")));
        assert!(game.view(&p("2")).unwrap().planets.contains_key(&e("a")));
    }

    #[test]
    fn test_duplicate_planet_id_is_an_error() {
        let mut description = duel_world();
        description.planets.push(PlanetRecord::new(0.5, 0.5).with_id("a"));
        let result = load(description);
        assert!(matches!(result, Err(PlanetWarsError::DuplicateId(id)) if id == e("a")));
    }

    #[test]
    fn test_unknown_controller_is_an_error() {
        let mut description = duel_world();
        description.players = Some(vec![
            PlayerRecord::new("1", "Nope"),
            PlayerRecord::new("2", "Idle"),
        ]);
        let result = load(description);
        assert!(matches!(result, Err(PlanetWarsError::UnknownController(_))));
    }

    #[test]
    fn test_panicking_controller_reported_and_game_continues() {
        use crate::controller::Controller;

        struct Boom;
        impl Controller for Boom {
            fn update(&mut self, _view: &mut PlayerView) {
                panic!("boom");
            }
        }

        let mut registry = ControllerRegistry::with_defaults();
        registry.register("Boom", || Box::new(Boom));
        let mut description = duel_world();
        description.players = Some(vec![
            PlayerRecord::new("1", "Boom"),
            PlayerRecord::new("2", "Idle"),
        ]);
        let mut game = Game::new(description, &registry, GameConfig::default()).unwrap();

        let events = game.update().unwrap();
        assert!(events
            .iter()
            .any(|ev| matches!(
                ev,
                GameEvent::ControllerFault { player, .. } if *player == p("1")
            )));
        assert_eq!(game.tick, 1);
    }

    #[test]
    fn test_replay_orders_run_before_controllers() {
        let mut description = duel_world();
        description.orders.push(RecordedOrder {
            id: None,
            owner: p("1"),
            tick: 2,
            name: None,
            kind: OrderKind::Planet,
            source: e("a"),
            destination: e("b"),
            ships: 7,
            new_fleet_id: e("replayed"),
        });
        let mut game = game(description);
        assert!(game.is_replaying());

        game.update().unwrap();
        game.update().unwrap();
        assert!(game.fleets.is_empty());
        game.update().unwrap();
        assert_eq!(game.fleets[&e("replayed")].ships(), 7);
        assert!(!game.is_replaying());
    }

    #[test]
    fn test_recorded_order_for_unknown_player_is_an_error() {
        let mut description = duel_world();
        description.orders.push(RecordedOrder {
            id: None,
            owner: p("9"),
            tick: 0,
            name: None,
            kind: OrderKind::Planet,
            source: e("a"),
            destination: e("b"),
            ships: 1,
            new_fleet_id: e("x"),
        });
        let result = load(description);
        assert!(matches!(result, Err(PlanetWarsError::UnknownPlayer(_))));
    }

    #[test]
    fn test_snapshot_preserves_state() {
        let mut game = game(duel_world());
        let fleet_id = queue_planet_order(&mut game, "1", "a", "b", 6);
        game.update().unwrap();

        let snapshot = game.snapshot();
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.fleets.len(), 1);
        assert_eq!(snapshot.fleets[0].id, Some(fleet_id.clone()));
        assert!((snapshot.fleets[0].x - 0.02).abs() < 1e-9);

        let restored = load(snapshot).unwrap();
        assert_eq!(restored.tick, 1);
        assert_eq!(restored.planets[&e("a")].ships(), game.planets[&e("a")].ships());
        assert_eq!(restored.fleets[&fleet_id].ships(), 6);
    }

    #[test]
    fn test_recording_stores_executed_ship_count() {
        let mut description = duel_world();
        description.planets[0].ships = Some(10);
        let mut game = game(description);
        game.record_replay();
        queue_planet_order(&mut game, "1", "a", "b", 15);
        game.update().unwrap();

        let replay = game.take_replay().unwrap();
        assert_eq!(replay.orders.len(), 1);
        assert_eq!(replay.orders[0].ships, 10);
        assert_eq!(replay.orders[0].tick, 0);
    }

    #[test]
    fn test_controller_cannot_order_as_another_player() {
        use crate::controller::{Controller, ControllerFault};

        struct Impostor;
        impl Controller for Impostor {
            fn update(&mut self, view: &mut PlayerView) {
                let mut forged = PlayerView::new(PlayerId::from("2"), "forged");
                forged.planet_order(&EntityId::from("c"), &EntityId::from("a"), 8);
                *view = forged;
            }
        }

        let mut registry = ControllerRegistry::with_defaults();
        registry.register("Impostor", || Box::new(Impostor));
        let mut description = duel_world();
        description.players = Some(vec![
            PlayerRecord::new("1", "Impostor"),
            PlayerRecord::new("2", "Idle"),
        ]);
        let mut game = Game::new(description, &registry, GameConfig::default()).unwrap();

        let events = game.update().unwrap();
        assert!(events.iter().any(|ev| matches!(
            ev,
            GameEvent::ControllerFault {
                player,
                fault: ControllerFault::ForeignView { .. },
                ..
            } if *player == p("1")
        )));
        assert!(game.fleets.is_empty());
        assert_eq!(game.planets[&e("c")].ships(), 11);
        assert_eq!(game.view(&p("1")).unwrap().id(), &p("1"));
        assert_eq!(game.view(&p("1")).unwrap().my_planets().len(), 1);
    }

    #[test]
    fn test_queued_orders_are_stamped_with_their_player() {
        let mut game = game(duel_world());
        // player 1's queue holding an order that names player 2
        let forged = Order::planet(p("2"), e("c"), e("a"), 8);
        game.players.get_mut(&p("1")).unwrap().view.push_order(forged);

        let events = game.update().unwrap();
        assert!(events.iter().any(|ev| matches!(
            ev,
            GameEvent::OrderRejected {
                owner,
                reason: RejectReason::NotOwner { .. },
                ..
            } if *owner == p("1")
        )));
        assert!(game.fleets.is_empty());
        assert_eq!(game.planets[&e("c")].ships(), 11);
    }

    #[test]
    fn test_neutral_fleet_is_a_load_error() {
        let mut description = duel_world();
        description.fleets.push(FleetRecord {
            id: Some(e("ghost")),
            owner: PlayerId::neutral(),
            ships: 50,
            x: 0.5,
            y: 0.5,
            destination: e("a"),
        });
        let result = load(description);
        assert!(matches!(result, Err(PlanetWarsError::NeutralFleet(id)) if id == e("ghost")));
    }

    #[test]
    fn test_all_neutral_world_is_not_alive() {
        let mut game = game(duel_world());
        for planet in game.planets.values_mut() {
            planet.state.owner = PlayerId::neutral();
        }
        assert!(!game.is_alive());
        assert!(game.is_finished());
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_launch_at_own_source_is_rejected() {
        let mut description = duel_world();
        description.planets[0].growth = Some(0);
        let mut game = game(description);
        queue_planet_order(&mut game, "1", "a", "a", 10);

        let events = game.update().unwrap();
        assert!(events.iter().any(|ev| matches!(
            ev,
            GameEvent::OrderRejected { reason: RejectReason::SameSourceAndDestination, .. }
        )));
        assert!(game.fleets.is_empty());
        assert_eq!(game.planets[&e("a")].ships(), 20);
    }
}
