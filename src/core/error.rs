use thiserror::Error;

use crate::core::types::{EntityId, PlayerId};

#[derive(Error, Debug)]
pub enum PlanetWarsError {
    #[error("{entity} (owner {owner}) cannot remove {requested} ships (has {available})")]
    InvalidShipRemoval {
        entity: EntityId,
        owner: PlayerId,
        requested: i64,
        available: u32,
    },

    #[error("{entity} cannot add a negative number of ships ({requested})")]
    NegativeShipAddition { entity: EntityId, requested: i64 },

    #[error("Not enough planets to spawn {players} players ({planets} neutral planets)")]
    NotEnoughPlanets { players: usize, planets: usize },

    #[error("Unknown controller: {0}")]
    UnknownController(String),

    #[error("Duplicate entity id: {0}")]
    DuplicateId(EntityId),

    #[error("Fleet {fleet} targets unknown planet {destination}")]
    UnknownDestination { fleet: EntityId, destination: EntityId },

    #[error("Fleet {0} is owned by the neutral player")]
    NeutralFleet(EntityId),

    #[error("Recorded order references unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, PlanetWarsError>;
