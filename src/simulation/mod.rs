//! The tick loop and everything it drives
//!
//! - `engine`: the `Game` value and its per-tick phases
//! - `battle`: arrival resolution at a planet
//! - `spawn`: starting planets for unplaced players
//! - `events`: what a tick reports
//! - `replay`: recording executed orders

pub mod battle;
pub mod engine;
pub mod events;
pub mod replay;
pub mod spawn;

pub use battle::BattleOutcome;
pub use engine::Game;
pub use events::{GameEvent, RejectReason};
pub use replay::ReplayRecorder;
pub use spawn::spawn_players;
