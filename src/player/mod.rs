//! Players: a fog-of-war view bound to a bot controller
//!
//! Each tick the engine refreshes the player's view, then hands it to the
//! controller, which queues orders through it. Orders are requests; the
//! engine decides what actually happens.

pub mod order;
pub mod view;

pub use order::{Order, OrderKind};
pub use view::PlayerView;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::controller::{Controller, ControllerFault};
use crate::core::types::PlayerId;

/// A participant in the game
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub view: PlayerView,
    controller: Box<dyn Controller>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, controller: Box<dyn Controller>) -> Self {
        let name = name.into();
        Self {
            view: PlayerView::new(id.clone(), name.clone()),
            id,
            name,
            controller,
        }
    }

    /// Let the controller queue orders for this tick
    ///
    /// A panic, or a run longer than `budget`, discards whatever the
    /// controller queued during this call and is reported as a fault.
    pub fn run_controller(&mut self, budget: Option<Duration>) -> Option<ControllerFault> {
        let queued_before = self.view.orders().len();
        let started = Instant::now();

        let controller = &mut self.controller;
        let view = &mut self.view;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| controller.update(view)));

        if let Err(payload) = outcome {
            self.view.truncate_orders(queued_before);
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            return Some(ControllerFault::Panicked { message });
        }

        if self.view.id() != &self.id {
            let claimed = self.view.id().clone();
            self.view = PlayerView::new(self.id.clone(), self.name.clone());
            return Some(ControllerFault::ForeignView { claimed });
        }

        let elapsed = started.elapsed();
        match budget {
            Some(budget) if elapsed > budget => {
                self.view.truncate_orders(queued_before);
                Some(ControllerFault::OverBudget {
                    elapsed_ms: elapsed.as_millis(),
                    budget_ms: budget.as_millis() as u64,
                })
            }
            _ => None,
        }
    }
}

impl fmt::Debug for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
