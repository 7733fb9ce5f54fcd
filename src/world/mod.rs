//! Serialized worlds: maps, snapshots, replays and the map generator

pub mod description;
pub mod generator;

pub use description::{FleetRecord, PlanetRecord, PlayerRecord, RecordedOrder, WorldDescription};
pub use generator::{MapGenConfig, MapGenerator};
