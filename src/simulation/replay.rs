//! Replay recording
//!
//! A replay is a world description: the state right after setup plus every
//! order that actually executed, keyed by tick. Loading it as a world replays
//! the game before handing control back to the bots.

use std::path::Path;

use crate::core::error::Result;
use crate::core::types::Tick;
use crate::player::Order;
use crate::world::{RecordedOrder, WorldDescription};

#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    description: WorldDescription,
}

impl ReplayRecorder {
    /// Start recording from `initial` (orders in it are discarded)
    pub fn new(mut initial: WorldDescription) -> Self {
        initial.orders.clear();
        Self { description: initial }
    }

    pub fn record(&mut self, tick: Tick, order: &Order) {
        self.description.orders.push(RecordedOrder::from_order(tick, order));
    }

    pub fn order_count(&self) -> usize {
        self.description.orders.len()
    }

    pub fn description(&self) -> &WorldDescription {
        &self.description
    }

    pub fn into_description(self) -> WorldDescription {
        self.description
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.description.save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{EntityId, PlayerId};
    use crate::world::PlanetRecord;

    #[test]
    fn test_records_orders_with_tick() {
        let initial = WorldDescription {
            planets: vec![PlanetRecord::new(0.0, 0.0).with_id("a")],
            ..Default::default()
        };
        let mut recorder = ReplayRecorder::new(initial);
        let order = Order::planet(PlayerId::from("1"), EntityId::from("a"), EntityId::from("b"), 4);
        recorder.record(9, &order);

        assert_eq!(recorder.order_count(), 1);
        let replay = recorder.into_description();
        assert_eq!(replay.orders[0].tick, 9);
        assert_eq!(replay.orders[0].to_order(), order);
    }
}
