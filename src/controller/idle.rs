use super::Controller;
use crate::player::PlayerView;

/// Never issues orders. Useful as a punching bag.
#[derive(Debug, Default)]
pub struct Idle;

impl Controller for Idle {
    fn update(&mut self, _view: &mut PlayerView) {}
}
