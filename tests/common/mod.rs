//! Shared world fixtures for integration tests

#![allow(dead_code)]

use planet_wars::controller::ControllerRegistry;
use planet_wars::core::config::GameConfig;
use planet_wars::simulation::Game;
use planet_wars::world::{PlanetRecord, PlayerRecord, WorldDescription};

/// Eight planets in two mirrored rows, players 1 and 2 in opposite corners
pub fn mirrored_world(bot_one: &str, bot_two: &str) -> WorldDescription {
    let mut planets = vec![
        PlanetRecord::new(0.1, 0.1).with_id("home1").with_owner("1").with_ships(50).with_growth(3),
        PlanetRecord::new(0.9, 0.9).with_id("home2").with_owner("2").with_ships(50).with_growth(3),
    ];
    for (index, x) in [0.25, 0.45, 0.65].iter().enumerate() {
        planets.push(
            PlanetRecord::new(*x, 0.2)
                .with_id(&format!("n{}a", index))
                .with_ships(10 + index as u32 * 5)
                .with_growth(index as u32 + 1),
        );
        planets.push(
            PlanetRecord::new(1.0 - *x, 0.8)
                .with_id(&format!("n{}b", index))
                .with_ships(10 + index as u32 * 5)
                .with_growth(index as u32 + 1),
        );
    }
    WorldDescription {
        planets,
        players: Some(vec![PlayerRecord::new("1", bot_one), PlayerRecord::new("2", bot_two)]),
        ..Default::default()
    }
}

pub fn new_game(description: WorldDescription) -> Game {
    Game::new(description, &ControllerRegistry::with_defaults(), GameConfig::default())
        .expect("fixture world should load")
}
