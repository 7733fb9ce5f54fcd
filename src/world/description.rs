//! JSON schema for maps, saved games and replays
//!
//! Field names match the lab's map files (`ID`, `x`, `y`, `owner`, `ships`,
//! `growth`). Coordinates are in map units; the engine multiplies them by
//! `SCALE_FACTOR` on load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{EntityId, PlayerId, Tick};
use crate::player::{Order, OrderKind};

/// Root structure of a map, snapshot or replay file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldDescription {
    pub planets: Vec<PlanetRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fleets: Vec<FleetRecord>,
    /// Missing means the runner supplies players
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerRecord>>,
    /// Recorded orders, executed before controllers take over
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub orders: Vec<RecordedOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<Tick>,
    /// Tick the world is at (0 for fresh maps)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub tick: Tick,
}

fn is_zero(tick: &Tick) -> bool {
    *tick == 0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub x: f64,
    pub y: f64,
    /// Missing or empty means neutral
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ships: Option<u32>,
    /// Defaults to 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth: Option<u32>,
}

impl PlanetRecord {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            id: None,
            x,
            y,
            owner: None,
            ships: None,
            growth: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(EntityId::from(id));
        self
    }

    pub fn with_owner(mut self, owner: &str) -> Self {
        self.owner = Some(PlayerId::from(owner));
        self
    }

    pub fn with_ships(mut self, ships: u32) -> Self {
        self.ships = Some(ships);
        self
    }

    pub fn with_growth(mut self, growth: u32) -> Self {
        self.growth = Some(growth);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetRecord {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub owner: PlayerId,
    pub ships: u32,
    pub x: f64,
    pub y: f64,
    pub destination: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "ID")]
    pub id: PlayerId,
    /// Controller name in the registry
    pub name: String,
}

impl PlayerRecord {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: PlayerId::from(id),
            name: name.to_string(),
        }
    }
}

/// An executed order, as stored in a replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedOrder {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner: PlayerId,
    pub tick: Tick,
    /// Written alongside `type` with the same value, as the lab's replays do
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<OrderKind>,
    #[serde(rename = "type")]
    pub kind: OrderKind,
    pub source: EntityId,
    pub destination: EntityId,
    pub ships: i64,
    pub new_fleet_id: EntityId,
}

impl RecordedOrder {
    pub fn from_order(tick: Tick, order: &Order) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            owner: order.owner.clone(),
            tick,
            name: Some(order.kind),
            kind: order.kind,
            source: order.source.clone(),
            destination: order.destination.clone(),
            ships: order.ships,
            new_fleet_id: order.fleet_id.clone(),
        }
    }

    pub fn to_order(&self) -> Order {
        Order {
            kind: self.kind,
            owner: self.owner.clone(),
            source: self.source.clone(),
            fleet_id: self.new_fleet_id.clone(),
            ships: self.ships,
            destination: self.destination.clone(),
        }
    }
}

impl WorldDescription {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
