//! Hexfall - Headless Skirmish
//!
//! Plays several enemy turns against a scripted opponent on a generated hex
//! board and prints a summary of what the AI did.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Parser;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use hexfall::ai::{Collaborators, EnemyAi, TurnReport};
use hexfall::core::error::Result;
use hexfall::core::AiConfig;
use hexfall::grid::HexCoord;
use hexfall::units::UnitType;
use hexfall::world::{
    Battlefield, GridMap, HexMap, Resource, Skirmish, StatsTable, Structure, Visibility, VisionSet,
};

/// Headless Skirmish - watch the enemy AI play
#[derive(Parser, Debug)]
#[command(name = "hexfall")]
#[command(about = "Run enemy AI turns on a generated board and print a summary")]
struct Args {
    /// Number of enemy turns to play
    #[arg(long, default_value_t = 10)]
    turns: u32,

    /// Board radius in hexes
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u32).range(5..))]
    radius: u32,

    /// Random seed for deterministic runs (overrides the config)
    #[arg(long)]
    seed: Option<u64>,

    /// AI config TOML; built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Unit stats TOML; built-in table when omitted
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// JSON output structure
#[derive(Serialize)]
struct Summary {
    seed: u64,
    turns: u32,
    units: usize,
    bases: usize,
    score: u32,
    techs_unlocked: u32,
    outcomes: BTreeMap<&'static str, usize>,
    reports: Vec<TurnReport>,
}

/// Opponent strength and how far it sees
const OPPONENT_VISION: u32 = 2;
const OPPONENT_STRIKE: u32 = 3;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hexfall=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AiConfig::load(path)?,
        None => AiConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let stats = match &args.stats {
        Some(path) => StatsTable::load(path)?,
        None => StatsTable::default(),
    };
    let seed = config.seed;

    tracing::info!("Hexfall skirmish: seed {}, {} turns, radius {}", seed, args.turns, args.radius);

    let radius = args.radius as i32;
    let ai_bases = [HexCoord::new(-radius + 2, 0), HexCoord::new(-radius + 2, radius - 3)];
    let mut opponent = build_opponent(args.radius);
    let mut reserved: Vec<HexCoord> = opponent.targets().iter().map(|t| t.position).collect();
    reserved.extend(ai_bases);

    let mut board_rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    let mut map = build_board(args.radius, &reserved, &mut board_rng);
    for target in opponent.targets() {
        map.set_occupied(target.position, true);
    }

    let mut ai = EnemyAi::new(config)?;
    for position in ai_bases {
        ai.register_base(position, 1, &mut map);
    }

    let rt = Runtime::new()?;
    let mut reports = Vec::new();
    let mut outcomes: BTreeMap<&'static str, usize> = BTreeMap::new();

    for turn in 1..=args.turns {
        let observers: Vec<HexCoord> = opponent.targets().iter().map(|t| t.position).collect();
        let vision = VisionSet::from_observers(&observers, OPPONENT_VISION);

        let report = {
            let mut world = Collaborators::new(&mut map, &stats, &vision, &mut opponent);
            rt.block_on(ai.run_enemy_turn(turn, &mut world))?
        };
        reports.push(report);

        // Destroyed opponent pieces free their tiles
        let survivors: Vec<HexCoord> = opponent.targets().iter().map(|t| t.position).collect();
        for position in observers.iter().filter(|p| !survivors.contains(p)) {
            map.set_occupied(*position, false);
        }

        opponent_strikes_back(&mut ai, &vision, &mut map);

        for outcome in ai.drain_outcomes() {
            *outcomes.entry(outcome.kind()).or_default() += 1;
        }
        if ai.bases().is_empty() && ai.units().is_empty() {
            tracing::info!("Enemy wiped out after turn {}", turn);
            break;
        }
    }

    let summary = Summary {
        seed,
        turns: reports.len() as u32,
        units: ai.units().len(),
        bases: ai.bases().len(),
        score: ai.score(),
        techs_unlocked: ai.techs_unlocked(),
        outcomes,
        reports,
    };

    if args.format == "text" {
        print_text(&summary, &ai);
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

/// Hexagonal board with a few obstacles, groves and resources.
///
/// `reserved` tiles stay plain land.
fn build_board(radius: u32, reserved: &[HexCoord], rng: &mut ChaCha8Rng) -> GridMap {
    let mut map = GridMap::hexagon(radius);
    let mut coords = map.coords();
    coords.shuffle(rng);

    let area = coords.len();
    let mut features = coords.into_iter().filter(|c| !reserved.contains(c));

    for coord in features.by_ref().take(area / 12) {
        map.set_walkable(coord, false);
    }
    for coord in features.by_ref().take(3) {
        map.set_structure(coord, Some(Structure::Grove { former_level: 1 }));
    }
    for coord in features.by_ref().take(area / 10) {
        let resource = if rng.gen_bool(0.5) {
            Resource::Fish
        } else {
            Resource::Debris
        };
        map.set_resource(coord, Some(resource));
    }

    map
}

/// Player base, a handful of player units and one sea monster
fn build_opponent(radius: u32) -> Skirmish {
    let r = radius as i32;
    let mut opponent = Skirmish::new();
    opponent.add_base(1, HexCoord::new(r - 1, 0), 40);
    opponent.add_unit(1, HexCoord::new(r - 2, 0), 10, 2);
    opponent.add_unit(2, HexCoord::new(r - 2, 1), 10, 2);
    opponent.add_unit(3, HexCoord::new(r - 1, -1), 12, 3);
    opponent.add_sea_monster(1, HexCoord::new(0, -r + 1), 20, 4);
    opponent
}

/// The opponent hits every AI unit it can see for a fixed amount
fn opponent_strikes_back(ai: &mut EnemyAi, vision: &VisionSet, map: &mut GridMap) {
    let spotted: Vec<_> = ai
        .units()
        .iter()
        .filter(|u| u.unit_type != UnitType::Builder)
        .filter(|u| vision.is_visible_to_opponent(u.position))
        .map(|u| u.id)
        .collect();

    for id in spotted {
        if let Err(e) = ai.damage_unit(id, OPPONENT_STRIKE, map) {
            tracing::warn!("Opponent strike on {} failed: {}", id, e);
        }
    }
}

fn print_text(summary: &Summary, ai: &EnemyAi) {
    println!("\n=== HEXFALL SKIRMISH (seed {}) ===", summary.seed);
    println!("Turns played:   {}", summary.turns);
    println!("Score:          {}", summary.score);
    println!("Techs unlocked: {}", summary.techs_unlocked);
    println!();
    println!("Bases ({}):", summary.bases);
    for base in ai.bases().iter() {
        println!(
            "  {} at ({}, {}) level {} hp {} housing {}",
            base.id, base.position.q, base.position.r, base.level, base.hp, base.housed_units
        );
    }
    println!("Units ({}):", summary.units);
    for unit in ai.units().iter() {
        println!(
            "  {} {:?} at ({}, {}) hp {} {:?}",
            unit.id, unit.unit_type, unit.position.q, unit.position.r, unit.hp, unit.state
        );
    }
    println!();
    println!("Outcomes:");
    for (kind, count) in &summary.outcomes {
        println!("  {:<20} {}", kind, count);
    }
}
