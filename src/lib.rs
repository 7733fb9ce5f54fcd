//! PlanetWars - a fog-of-war planet capture simulation
//!
//! Bots control players, each seeing the world only through its own
//! `PlayerView`. The `Game` advances one tick per `update()`.

pub mod controller;
pub mod core;
pub mod entity;
pub mod player;
pub mod simulation;
pub mod world;

pub use crate::controller::{Controller, ControllerRegistry};
pub use crate::core::{GameConfig, PlanetWarsError, Result};
pub use crate::simulation::{Game, GameEvent};
pub use crate::world::WorldDescription;
