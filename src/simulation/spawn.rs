//! Starting planets for players the map didn't place

use std::cmp::Reverse;
use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::core::error::{PlanetWarsError, Result};
use crate::core::types::{EntityId, PlayerId, Position};
use crate::entity::{Entity, Planet};

/// Give every planet-less player a neutral planet
///
/// Each pick is the neutral planet farthest from the centroid of all owned
/// planets (including earlier picks). With nothing owned yet the first
/// neutral planet in id order is taken. Returns the assignments made.
pub fn spawn_players<'a, I>(
    planets: &mut BTreeMap<EntityId, Planet>,
    players: I,
) -> Result<Vec<(PlayerId, EntityId)>>
where
    I: IntoIterator<Item = &'a PlayerId>,
{
    let needing: Vec<PlayerId> = players
        .into_iter()
        .filter(|player| !planets.values().any(|p| p.is_owned_by(player)))
        .cloned()
        .collect();

    let mut neutral: Vec<EntityId> = planets
        .values()
        .filter(|p| p.is_neutral())
        .map(|p| p.id().clone())
        .collect();

    if needing.len() > neutral.len() {
        return Err(PlanetWarsError::NotEnoughPlanets {
            players: needing.len(),
            planets: neutral.len(),
        });
    }

    let mut owned_sum = Position::ZERO;
    let mut owned_count = 0usize;
    for planet in planets.values().filter(|p| !p.is_neutral()) {
        owned_sum += planet.position();
        owned_count += 1;
    }

    let mut assigned = Vec::with_capacity(needing.len());
    for player in needing {
        let pick = if owned_count == 0 {
            0
        } else {
            let centroid = owned_sum / owned_count as f64;
            neutral
                .iter()
                .enumerate()
                .min_by_key(|(_, id)| {
                    let distance = planets
                        .get(*id)
                        .map(|p| p.distance_to_point(centroid))
                        .unwrap_or(0.0);
                    Reverse(OrderedFloat(distance))
                })
                .map(|(index, _)| index)
                .unwrap_or(0)
        };

        let id = neutral.remove(pick);
        if let Some(planet) = planets.get_mut(&id) {
            planet.state.owner = player.clone();
            owned_sum += planet.position();
            owned_count += 1;
        }
        tracing::info!(player = %player, planet = %id, "spawned player");
        assigned.push((player, id));
    }

    Ok(assigned)
}
