//! Bot controllers
//!
//! Architecture: trait + registry
//! - `Controller` is the single capability a bot implements
//! - `ControllerRegistry` maps a bot name (as written in map files or on the
//!   command line) to a constructor, replacing dynamic module lookup
//! - Bots only ever see their own `PlayerView`

pub mod idle;
pub mod one_move;
pub mod one_slow_move;

pub use idle::Idle;
pub use one_move::OneMove;
pub use one_slow_move::OneSlowMove;

use std::collections::BTreeMap;
use std::fmt;

use crate::core::error::{PlanetWarsError, Result};
use crate::core::types::PlayerId;
use crate::player::PlayerView;

/// Trait for bot implementations
pub trait Controller {
    /// Inspect the view and queue orders through it. Called once per tick.
    fn update(&mut self, view: &mut PlayerView);
}

/// Why a controller's orders were thrown away for a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerFault {
    /// The controller panicked during `update`
    Panicked { message: String },
    /// The controller ran longer than the configured budget
    OverBudget { elapsed_ms: u128, budget_ms: u64 },
    /// The controller swapped its view for one belonging to someone else
    ForeignView { claimed: PlayerId },
}

impl fmt::Display for ControllerFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerFault::Panicked { message } => write!(f, "panicked: {}", message),
            ControllerFault::OverBudget { elapsed_ms, budget_ms } => {
                write!(f, "took {}ms (budget {}ms)", elapsed_ms, budget_ms)
            }
            ControllerFault::ForeignView { claimed } => {
                write!(f, "replaced its view with one for player {}", claimed)
            }
        }
    }
}

/// Constructor for a controller
pub type ControllerFactory = fn() -> Box<dyn Controller>;

/// Name → constructor lookup for bots
#[derive(Clone)]
pub struct ControllerRegistry {
    factories: BTreeMap<String, ControllerFactory>,
}

impl ControllerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with the bundled bots
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("Idle", || Box::new(Idle));
        registry.register("OneMove", || Box::new(OneMove));
        registry.register("OneSlowMove", || Box::new(OneSlowMove::new()));
        registry
    }

    pub fn register(&mut self, name: &str, factory: ControllerFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Build the controller registered under `name`
    pub fn create(&self, name: &str) -> Result<Box<dyn Controller>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| PlanetWarsError::UnknownController(name.to_string()))
    }
}

impl Default for ControllerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
