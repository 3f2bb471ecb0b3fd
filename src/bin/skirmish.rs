//! Headless Skirmish Runner
//!
//! Plays AI vs AI matches and prints a summary as JSON or text.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use steel_tide::core::{MatchConfig, PerPlayer, Player, Result, Timestamp};
use steel_tide::game::{
    load_profile, new_match, start_new_turn, AiPlanner, AiProfile, Difficulty, EventLog, GameAI,
    MapId, NationId,
};

/// Headless Skirmish Runner - AI vs AI matches
#[derive(Parser, Debug)]
#[command(name = "skirmish")]
#[command(about = "Run AI vs AI matches and print a summary")]
struct Args {
    /// Map to play on (DEFAULT, ARCHIPELAGO, GOLDEN_VALLEY)
    #[arg(long)]
    map: Option<MapId>,

    /// Nation for PLAYER1
    #[arg(long)]
    p1_nation: Option<NationId>,

    /// Nation for PLAYER2
    #[arg(long)]
    p2_nation: Option<NationId>,

    /// AI difficulty for PLAYER1 (profile loaded from data/ai_profiles/)
    #[arg(long)]
    p1_difficulty: Option<Difficulty>,

    /// AI difficulty for PLAYER2 (profile loaded from data/ai_profiles/)
    #[arg(long)]
    p2_difficulty: Option<Difficulty>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Full turns before the match is called a draw
    #[arg(long)]
    max_turns: Option<u32>,

    /// Match configuration file (TOML); flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Log every AI decision
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct MatchSummary {
    winner: Option<Player>,
    turns: u32,
    base_hp: PerPlayer<i32>,
    money: PerPlayer<u32>,
    surviving_units: PerPlayer<usize>,
    events: BTreeMap<&'static str, usize>,
    profiles: PerPlayer<String>,
    map: MapId,
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "steel_tide=debug"
    } else {
        "steel_tide=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(map) = args.map {
        config.map = map;
    }
    if let Some(nation) = args.p1_nation {
        config.nations.player1 = nation;
    }
    if let Some(nation) = args.p2_nation {
        config.nations.player2 = nation;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_turns) = args.max_turns {
        config.max_turns = max_turns;
    }

    let difficulties = PerPlayer::new(
        args.p1_difficulty.unwrap_or(config.difficulty),
        args.p2_difficulty.unwrap_or(config.difficulty),
    );
    let profiles = difficulties.map(|&difficulty| profile_for(difficulty));

    let mut planners = PerPlayer::new(
        AiPlanner::with_seed(profiles.player1.clone(), config.seed),
        AiPlanner::with_seed(profiles.player2.clone(), config.seed.wrapping_add(1)),
    );

    let mut state = new_match(&config, now());
    let mut log = EventLog::new();

    while state.winner().is_none() && state.turn <= config.max_turns {
        let player = state.current_player;
        let step = planners[player].process_turn(&state, now());
        log.extend(step.events);
        state = step.state;
        if state.winner().is_some() {
            break;
        }

        let step = start_new_turn(&state, now());
        log.extend(step.events);
        state = step.state;
    }

    match state.winner() {
        Some(winner) => info!(%winner, turn = state.turn, "match finished"),
        None => info!(turn = state.turn, "turn limit reached; draw"),
    }

    let summary = MatchSummary {
        winner: state.winner(),
        turns: state.turn.min(config.max_turns),
        base_hp: state.base_hp,
        money: state.money,
        surviving_units: PerPlayer::new(
            state.living_units(Player::Player1).count(),
            state.living_units(Player::Player2).count(),
        ),
        events: log.tally(),
        profiles: profiles.map(|p| p.name.clone()),
        map: config.map,
        seed: config.seed,
    };

    match args.format.as_str() {
        "text" => print_text(&summary),
        "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
        other => {
            warn!("unknown format '{other}', defaulting to json");
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

/// Shipped profile for `difficulty`, or the built-in one if the file is unusable
fn profile_for(difficulty: Difficulty) -> AiProfile {
    let name = difficulty.as_str().to_ascii_lowercase();
    load_profile(&name).unwrap_or_else(|e| {
        warn!("failed to load AI profile '{name}': {e}; using built-in");
        AiProfile::for_difficulty(difficulty)
    })
}

fn now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as Timestamp)
        .unwrap_or(0)
}

fn print_text(summary: &MatchSummary) {
    println!("Skirmish Result");
    println!("===============");
    match summary.winner {
        Some(winner) => println!("Winner: {winner}"),
        None => println!("Winner: none (draw)"),
    }
    println!("Turns: {}", summary.turns);
    println!("Map: {}", summary.map);
    for player in Player::ALL {
        println!(
            "{player}: base HP {}, money {}, units {}, profile {}",
            summary.base_hp[player],
            summary.money[player],
            summary.surviving_units[player],
            summary.profiles[player]
        );
    }
    println!();
    println!("Events:");
    for (name, count) in &summary.events {
        println!("  {name}: {count}");
    }
    println!();
    println!("Seed: {}", summary.seed);
}
