//! PlanetWars - headless runner
//!
//! Loads a map (or a replay, or generates a map from a seed), runs the bots
//! until one player is left or the tick limit is hit, and prints a summary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use planet_wars::controller::ControllerRegistry;
use planet_wars::core::config::GameConfig;
use planet_wars::core::error::{PlanetWarsError, Result};
use planet_wars::core::types::PlayerId;
use planet_wars::entity::Entity;
use planet_wars::simulation::Game;
use planet_wars::world::{MapGenConfig, MapGenerator, PlayerRecord, WorldDescription};

/// Headless PlanetWars runner - bot vs bot games
#[derive(Parser, Debug)]
#[command(name = "planet-wars")]
#[command(about = "Run PlanetWars bot games without a display")]
struct Args {
    /// Map file (JSON world description)
    #[arg(long, conflicts_with = "replay")]
    map: Option<PathBuf>,

    /// Replay file to play back
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Bot names, one per player (used when the map names no players)
    #[arg(long, short = 'p', num_args = 1.., default_values = ["OneMove", "OneSlowMove"])]
    players: Vec<String>,

    /// Maximum ticks before the game is called a draw
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Write a replay of this game
    #[arg(long)]
    save_replay: Option<PathBuf>,

    /// Game configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the generated map when neither --map nor --replay is given
    #[arg(long)]
    seed: Option<u64>,

    /// Write every game event, one line each
    #[arg(long)]
    event_log: Option<PathBuf>,

    /// Tracing filter, overrides RUST_LOG
    #[arg(long)]
    log_level: Option<String>,
}

/// Printed to stdout when the game ends
#[derive(Serialize)]
struct GameSummary {
    winner: Option<String>,
    ticks: u64,
    players: Vec<PlayerSummary>,
}

#[derive(Serialize)]
struct PlayerSummary {
    id: String,
    name: String,
    planets: usize,
    ships: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("planet_wars=info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(max_ticks) = args.max_ticks {
        config = config.with_max_ticks(max_ticks);
    }

    let mut description = load_world(&args)?;
    if description.players.is_none() {
        description.players = Some(
            args.players
                .iter()
                .enumerate()
                .map(|(index, name)| PlayerRecord::new(&(index + 1).to_string(), name))
                .collect(),
        );
    }
    if args.max_ticks.is_some() {
        description.max_ticks = Some(config.max_ticks);
    }

    let registry = ControllerRegistry::with_defaults();
    let mut game = Game::new(description, &registry, config)?;
    if args.save_replay.is_some() {
        game.record_replay();
    }

    let mut event_log = match &args.event_log {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };

    tracing::info!(max_ticks = game.max_ticks, "game starting");
    while !game.is_finished() {
        let events = game.update()?;
        if let Some(log) = event_log.as_mut() {
            for event in &events {
                writeln!(log, "{}", event)?;
            }
        }
    }
    if let Some(log) = event_log.as_mut() {
        log.flush()?;
    }

    let winner = game.winner();
    match &winner {
        Some(id) => tracing::info!(tick = game.tick, winner = %id, "game over"),
        None => tracing::info!(tick = game.tick, "game ended without a winner"),
    }

    if let (Some(path), Some(replay)) = (&args.save_replay, game.take_replay()) {
        replay.save(path)?;
        tracing::info!(path = %path.display(), orders = replay.orders.len(), "replay saved");
    }

    let summary = summarize(&game, winner);
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_world(args: &Args) -> Result<WorldDescription> {
    if let Some(path) = &args.replay {
        let replay = WorldDescription::load(path)?;
        if replay.players.is_none() {
            return Err(PlanetWarsError::InvalidConfig(format!(
                "replay {} names no players",
                path.display()
            )));
        }
        return Ok(replay);
    }
    if let Some(path) = &args.map {
        return WorldDescription::load(path);
    }

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    tracing::info!(seed, "no map given, generating one");
    Ok(MapGenerator::new(MapGenConfig::default(), seed)?.generate())
}

fn summarize(game: &Game, winner: Option<PlayerId>) -> GameSummary {
    let players = game
        .players
        .values()
        .map(|player| PlayerSummary {
            id: player.id.to_string(),
            name: player.name.clone(),
            planets: game.planets.values().filter(|p| p.is_owned_by(&player.id)).count(),
            ships: game
                .planets
                .values()
                .map(|p| (p.owner(), p.ships()))
                .chain(game.fleets.values().map(|f| (f.owner(), f.ships())))
                .filter(|(owner, _)| *owner == &player.id)
                .map(|(_, ships)| u64::from(ships))
                .sum(),
        })
        .collect();

    GameSummary {
        winner: winner.map(|id| id.to_string()),
        ticks: game.tick,
        players,
    }
}
