pub mod config;
pub mod error;
pub mod types;

pub use config::GameConfig;
pub use error::{PlanetWarsError, Result};
pub use types::{EntityId, PlayerId, Position, Tick};
