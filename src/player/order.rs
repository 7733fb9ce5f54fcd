//! Orders: requests from a controller to move ships

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, PlayerId};

/// Where the ships of an order come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    /// Launch a new fleet from a planet
    Planet,
    /// Divert some or all ships of a fleet in flight
    Fleet,
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKind::Planet => f.write_str("planet"),
            OrderKind::Fleet => f.write_str("fleet"),
        }
    }
}

/// A request to send ships to a planet
///
/// Nothing here is trusted: the engine checks ownership, existence and ship
/// counts before acting on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub kind: OrderKind,
    /// Player the order claims to come from
    pub owner: PlayerId,
    pub source: EntityId,
    /// Id the new fleet will carry if the order executes
    pub fleet_id: EntityId,
    pub ships: i64,
    pub destination: EntityId,
}

impl Order {
    pub fn planet(
        owner: PlayerId,
        source: EntityId,
        destination: EntityId,
        ships: i64,
    ) -> Self {
        Self {
            kind: OrderKind::Planet,
            owner,
            source,
            fleet_id: EntityId::new(),
            ships,
            destination,
        }
    }

    pub fn fleet(
        owner: PlayerId,
        source: EntityId,
        fleet_id: EntityId,
        destination: EntityId,
        ships: i64,
    ) -> Self {
        Self {
            kind: OrderKind::Fleet,
            owner,
            source,
            fleet_id,
            ships,
            destination,
        }
    }
}
