//! Like `OneMove`, but waits for a slowly rising threshold before launching

use super::Controller;
use crate::entity::Entity;
use crate::player::PlayerView;

/// Threshold gained per tick
const PATIENCE_STEP: f64 = 0.5;

#[derive(Debug, Default)]
pub struct OneSlowMove {
    counter: f64,
}

impl OneSlowMove {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Controller for OneSlowMove {
    fn update(&mut self, view: &mut PlayerView) {
        let Some((source, ships)) = view
            .my_planets()
            .first()
            .map(|p| (p.id().clone(), p.ships()))
        else {
            return;
        };

        self.counter += PATIENCE_STEP;
        if f64::from(ships) <= self.counter {
            return;
        }

        let Some(destination) = view.not_my_planets().first().map(|p| p.id().clone()) else {
            return;
        };
        view.planet_order(&source, &destination, i64::from(ships));
    }
}
