//! Map generator
//!
//! Writes `count` seeded maps as JSON world descriptions. Map `i` uses
//! `i + 1` sectors unless `--sectors` fixes it.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use planet_wars::core::error::Result;
use planet_wars::world::{MapGenConfig, MapGenerator};

/// PlanetWars map generator
#[derive(Parser, Debug)]
#[command(name = "map_gen")]
#[command(about = "Generate symmetric PlanetWars maps")]
struct Args {
    /// Number of maps to write
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// Rotational symmetry for every map (default: map index + 1)
    #[arg(long)]
    sectors: Option<u32>,

    /// Planets scattered per sector before culling
    #[arg(long, default_value_t = 12)]
    planets: usize,

    /// Minimum distance between planets, in map units
    #[arg(long, default_value_t = 0.15)]
    min_distance: f64,

    /// Random seed for deterministic output
    #[arg(long)]
    seed: Option<u64>,

    /// Directory the maps are written to
    #[arg(long, default_value = "maps")]
    out_dir: PathBuf,

    /// Number of the first map file (mapNNN.json)
    #[arg(long, default_value_t = 1)]
    first: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("planet_wars=info,map_gen=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let seed = args.seed.unwrap_or_else(rand::random);
    std::fs::create_dir_all(&args.out_dir)?;

    for index in 0..args.count {
        let config = MapGenConfig {
            planets_per_sector: args.planets,
            sectors: args.sectors.unwrap_or(index as u32 + 1),
            min_distance: args.min_distance,
            ..Default::default()
        };
        let mut generator = MapGenerator::new(config, seed.wrapping_add(index as u64))?;
        let map = generator.generate();

        let path = args.out_dir.join(format!("map{:03}.json", args.first + index));
        map.save(&path)?;
        tracing::info!(
            path = %path.display(),
            planets = map.planets.len(),
            sectors = generator.config().sectors,
            "wrote map"
        );
    }

    println!("seed {}", seed);
    Ok(())
}
