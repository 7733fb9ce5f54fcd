//! Events produced by a game tick
//!
//! Every change the engine makes to the canonical world shows up here (or in
//! the replay). `Display` renders the one-line log form.

use std::fmt;

use crate::controller::ControllerFault;
use crate::core::types::{EntityId, PlayerId, Tick};
use crate::player::OrderKind;

/// Why an order was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    UnknownSource,
    UnknownDestination,
    NotOwner { actual: PlayerId },
    NoShips,
    FleetIdInUse,
    /// A planet launching at itself
    SameSourceAndDestination,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownSource => f.write_str("not a valid source"),
            RejectReason::UnknownDestination => f.write_str("not a valid destination"),
            RejectReason::NotOwner { actual } => {
                write!(f, "player does not own source (owner is {})", actual)
            }
            RejectReason::NoShips => f.write_str("no ships to launch"),
            RejectReason::FleetIdInUse => f.write_str("fleet id already in use"),
            RejectReason::SameSourceAndDestination => f.write_str("source is the destination"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A fleet was launched or split off
    OrderExecuted {
        tick: Tick,
        owner: PlayerId,
        kind: OrderKind,
        source: EntityId,
        fleet: EntityId,
        ships: u32,
        /// Ships left at the source
        remaining: u32,
        destination: EntityId,
    },
    /// An order asked for more ships than the source had; the maximum was used
    OrderClamped {
        tick: Tick,
        owner: PlayerId,
        source: EntityId,
        requested: i64,
        available: u32,
    },
    OrderRejected {
        tick: Tick,
        owner: PlayerId,
        source: EntityId,
        reason: RejectReason,
    },
    /// Only the owner's ships arrived
    Reinforced {
        tick: Tick,
        planet: EntityId,
        owner: PlayerId,
        ships: u32,
    },
    /// A battle the planet's owner survived (including ties)
    Defended {
        tick: Tick,
        planet: EntityId,
        owner: PlayerId,
        ships: u32,
        ships_lost: u64,
    },
    Captured {
        tick: Tick,
        planet: EntityId,
        previous_owner: PlayerId,
        owner: PlayerId,
        ships: u32,
        ships_lost: u64,
    },
    /// A controller's orders were discarded for this tick
    ControllerFault {
        tick: Tick,
        player: PlayerId,
        fault: ControllerFault,
    },
}

impl GameEvent {
    pub fn tick(&self) -> Tick {
        match self {
            GameEvent::OrderExecuted { tick, .. }
            | GameEvent::OrderClamped { tick, .. }
            | GameEvent::OrderRejected { tick, .. }
            | GameEvent::Reinforced { tick, .. }
            | GameEvent::Defended { tick, .. }
            | GameEvent::Captured { tick, .. }
            | GameEvent::ControllerFault { tick, .. } => *tick,
        }
    }

    /// Ownership change or fleet creation/destruction
    pub fn changes_map(&self) -> bool {
        matches!(
            self,
            GameEvent::OrderExecuted { .. }
                | GameEvent::Reinforced { .. }
                | GameEvent::Defended { .. }
                | GameEvent::Captured { .. }
        )
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::OrderExecuted {
                tick,
                owner,
                kind,
                source,
                ships,
                remaining,
                destination,
                ..
            } => write!(
                f,
                "{:4}: Player {} launched {} (left {}) ships from {} {} to planet {}",
                tick, owner, ships, remaining, kind, source, destination
            ),
            GameEvent::OrderClamped {
                tick,
                owner,
                source,
                requested,
                available,
            } => write!(
                f,
                "{:4}: Invalid order modified - player {} asked {} for {} ships, {} used",
                tick, owner, source, requested, available
            ),
            GameEvent::OrderRejected {
                tick,
                owner,
                source,
                reason,
            } => write!(
                f,
                "{:4}: Invalid order ignored - player {} from {}: {}",
                tick, owner, source, reason
            ),
            GameEvent::Reinforced {
                tick, planet, owner, ..
            } => write!(f, "{:4}: Player {} reinforced planet {}", tick, owner, planet),
            GameEvent::Defended {
                tick, planet, owner, ..
            } => write!(f, "{:4}: Player {} defended planet {}", tick, owner, planet),
            GameEvent::Captured {
                tick, planet, owner, ..
            } => write!(f, "{:4}: Player {} now owns planet {}", tick, owner, planet),
            GameEvent::ControllerFault {
                tick,
                player,
                fault,
            } => write!(f, "{:4}: Player {} controller {}, orders dropped", tick, player, fault),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_log_line() {
        let event = GameEvent::Captured {
            tick: 7,
            planet: EntityId::from("b"),
            previous_owner: PlayerId::neutral(),
            owner: PlayerId::from("1"),
            ships: 5,
            ships_lost: 5,
        };
        assert_eq!(event.to_string(), "   7: Player 1 now owns planet b");
        assert!(event.changes_map());
        assert_eq!(event.tick(), 7);
    }

    #[test]
    fn test_rejection_does_not_change_map() {
        let event = GameEvent::OrderRejected {
            tick: 0,
            owner: PlayerId::from("1"),
            source: EntityId::from("a"),
            reason: RejectReason::NoShips,
        };
        assert!(!event.changes_map());
        assert!(event.to_string().contains("no ships to launch"));
    }
}
