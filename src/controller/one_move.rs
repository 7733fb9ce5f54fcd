//! Sends everything from its first planet to the first planet it doesn't own

use super::Controller;
use crate::entity::Entity;
use crate::player::PlayerView;

#[derive(Debug, Default)]
pub struct OneMove;

impl Controller for OneMove {
    fn update(&mut self, view: &mut PlayerView) {
        let (source, destination, ships) = {
            let (Some(src), Some(dest)) = (
                view.my_planets().first().copied(),
                view.not_my_planets().first().copied(),
            ) else {
                return;
            };
            (src.id().clone(), dest.id().clone(), src.ships())
        };

        if ships == 0 {
            return;
        }

        view.planet_order(&source, &destination, i64::from(ships));
        view.log(&format!(
            "sending {} ships from planet {} to planet {}",
            ships, source, destination
        ));
    }
}
