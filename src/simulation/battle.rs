//! Battle resolution at a planet
//!
//! All forces at a planet (the garrison plus every arriving fleet) are
//! tallied by owner. The largest force wins and keeps the gap to the second
//! largest; everyone else cancels out. A tie at the top leaves the planet
//! with its current owner and no ships.

use std::cmp::Reverse;

use ahash::AHashMap;

use crate::core::types::PlayerId;
use crate::entity::{Entity, Fleet, Planet};

/// Result of resolving all arrivals at one planet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleOutcome {
    /// Only the planet owner's ships were present
    Reinforced { owner: PlayerId, ships: u32 },
    /// Contested, and the planet kept its owner
    Defended { owner: PlayerId, ships: u32, ships_lost: u64 },
    /// Contested, and the planet changed hands
    Captured {
        previous_owner: PlayerId,
        owner: PlayerId,
        ships: u32,
        ships_lost: u64,
    },
}

impl BattleOutcome {
    pub fn owner(&self) -> &PlayerId {
        match self {
            BattleOutcome::Reinforced { owner, .. }
            | BattleOutcome::Defended { owner, .. }
            | BattleOutcome::Captured { owner, .. } => owner,
        }
    }

    pub fn ships(&self) -> u32 {
        match self {
            BattleOutcome::Reinforced { ships, .. }
            | BattleOutcome::Defended { ships, .. }
            | BattleOutcome::Captured { ships, .. } => *ships,
        }
    }
}

/// Ships present at `planet` per owner, including its garrison
pub fn tally_forces(planet: &Planet, arriving: &[Fleet]) -> AHashMap<PlayerId, u64> {
    let mut forces = AHashMap::new();
    forces.insert(planet.owner().clone(), u64::from(planet.ships()));
    for fleet in arriving {
        *forces.entry(fleet.owner().clone()).or_insert(0) += u64::from(fleet.ships());
    }
    forces
}

/// Decide the planet's new owner and garrison from the tallied forces
///
/// Depends only on the multiset of (owner, ships) pairs, never on the order
/// fleets arrived in.
pub fn resolve(current_owner: &PlayerId, forces: &AHashMap<PlayerId, u64>) -> BattleOutcome {
    let total: u64 = forces.values().sum();

    if forces.len() <= 1 {
        return BattleOutcome::Reinforced {
            owner: current_owner.clone(),
            ships: clamp_ships(total),
        };
    }

    let mut ranked: Vec<(u64, &PlayerId)> =
        forces.iter().map(|(owner, ships)| (*ships, owner)).collect();
    ranked.sort_by_key(|&(ships, owner)| (Reverse(ships), owner.clone()));

    let (first_ships, first_owner) = ranked[0];
    let (second_ships, _) = ranked[1];
    let gap = first_ships - second_ships;
    let ships = clamp_ships(gap);
    let ships_lost = total - gap;

    let winner = if gap == 0 { current_owner } else { first_owner };

    if winner == current_owner {
        BattleOutcome::Defended {
            owner: winner.clone(),
            ships,
            ships_lost,
        }
    } else {
        BattleOutcome::Captured {
            previous_owner: current_owner.clone(),
            owner: winner.clone(),
            ships,
            ships_lost,
        }
    }
}

fn clamp_ships(ships: u64) -> u32 {
    u32::try_from(ships).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forces(entries: &[(&str, u64)]) -> AHashMap<PlayerId, u64> {
        entries
            .iter()
            .map(|(owner, ships)| (PlayerId::from(*owner), *ships))
            .collect()
    }

    #[test]
    fn test_single_owner_reinforces() {
        let outcome = resolve(&PlayerId::from("1"), &forces(&[("1", 15)]));
        assert_eq!(
            outcome,
            BattleOutcome::Reinforced {
                owner: PlayerId::from("1"),
                ships: 15
            }
        );
    }

    #[test]
    fn test_attacker_captures_with_gap() {
        let outcome = resolve(&PlayerId::neutral(), &forces(&[("0", 5), ("1", 10)]));
        assert_eq!(
            outcome,
            BattleOutcome::Captured {
                previous_owner: PlayerId::neutral(),
                owner: PlayerId::from("1"),
                ships: 5,
                ships_lost: 10,
            }
        );
    }

    #[test]
    fn test_tie_keeps_owner_with_zero_ships() {
        let outcome = resolve(&PlayerId::from("1"), &forces(&[("1", 8), ("2", 8)]));
        assert_eq!(outcome.owner(), &PlayerId::from("1"));
        assert_eq!(outcome.ships(), 0);
        assert!(matches!(outcome, BattleOutcome::Defended { ships_lost: 16, .. }));
    }

    #[test]
    fn test_tie_between_attackers_keeps_third_party_owner() {
        let outcome = resolve(&PlayerId::neutral(), &forces(&[("0", 1), ("1", 6), ("2", 6)]));
        assert_eq!(outcome.owner(), &PlayerId::neutral());
        assert_eq!(outcome.ships(), 0);
    }

    #[test]
    fn test_three_way_battle_gap_to_second() {
        let outcome = resolve(&PlayerId::from("1"), &forces(&[("1", 4), ("2", 20), ("3", 9)]));
        assert_eq!(outcome.owner(), &PlayerId::from("2"));
        assert_eq!(outcome.ships(), 11);
    }

    #[test]
    fn test_tally_merges_same_owner_fleets() {
        use crate::core::types::{EntityId, Position};
        let planet = Planet::new(EntityId::from("p"), Position::ZERO, PlayerId::neutral(), 3, 1);
        let arriving = vec![
            Fleet::new(EntityId::from("f1"), PlayerId::from("1"), 4, Position::ZERO, &planet),
            Fleet::new(EntityId::from("f2"), PlayerId::from("1"), 6, Position::ZERO, &planet),
        ];
        let tally = tally_forces(&planet, &arriving);
        assert_eq!(tally[&PlayerId::from("1")], 10);
        assert_eq!(tally[&PlayerId::neutral()], 3);
    }
}
