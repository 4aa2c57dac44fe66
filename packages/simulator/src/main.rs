//! Impostor simulator CLI - plays whole sessions in memory for balance testing.
//!
//! Sessions run through the engine's public calls only. Discussion time is
//! ticked by hand unless `--realtime` drives it with the async round clock.

mod metrics;
mod output;
mod simulator;
mod types;

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use impostor_engine::domain::words::CATEGORIES;
use impostor_engine::{EngineConfig, Settings};
use metrics::{build_game_metrics, GameConfig, WinTally};
use output::OutputWriter;
use simulator::{GameResult, Simulator, SimulatorError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use types::{Behavior, EnemiesArg, ModeArg, OutputFormat};

#[derive(Parser)]
#[command(name = "impostor-simulator")]
#[command(about = "In-memory session simulator for the impostor party game")]
struct Args {
    /// Number of sessions to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Seat this many generated players
    #[arg(short, long, default_value = "6", conflicts_with = "names")]
    players: usize,

    /// Comma-separated player names, in lobby order
    #[arg(long, value_delimiter = ',')]
    names: Option<Vec<String>>,

    #[arg(long, default_value = "tournament")]
    mode: ModeArg,

    /// Regular rounds in a tournament
    #[arg(long, default_value = "3")]
    rounds: u32,

    #[arg(long, default_value = "impostor")]
    enemies: EnemiesArg,

    /// Discussion time in seconds
    #[arg(long, default_value = "60")]
    timer: u32,

    /// Comma-separated category names; all categories when omitted
    #[arg(long, value_delimiter = ',')]
    categories: Option<Vec<String>>,

    /// Show the category to the impostor
    #[arg(long)]
    category_hint: bool,

    /// Base session seed; session N uses seed + N. Falls back to IMPOSTOR_SEED.
    #[arg(long)]
    seed: Option<u64>,

    /// Chance the table votes before time runs out
    #[arg(long, default_value = "0.5")]
    early_vote: f64,

    /// Chance an accusation lands on an enemy
    #[arg(long, default_value = "0.5")]
    accuracy: f64,

    /// Chance a caught Mr. Wolf names the word
    #[arg(long, default_value = "0.2")]
    wolf_accuracy: f64,

    /// Drive discussion with the async clock, one game second per tick.
    /// Uses IMPOSTOR_TICK_MS unless --tick-ms is given.
    #[arg(long)]
    realtime: bool,

    #[arg(long, requires = "realtime")]
    tick_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: PathBuf,

    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress output files
    #[arg(long)]
    compress: bool,
}

impl Args {
    fn settings(&self) -> Settings {
        let player_names = match &self.names {
            Some(names) => names.clone(),
            None => generated_names(self.players),
        };
        let selected_categories: BTreeSet<String> = match &self.categories {
            Some(chosen) => chosen.iter().map(|c| c.trim().to_string()).collect(),
            None => CATEGORIES.iter().map(|c| c.name.to_string()).collect(),
        };
        Settings {
            player_names,
            timer_duration_secs: self.timer,
            mode: self.mode.into(),
            total_rounds: self.rounds,
            enemy_config: self.enemies.into(),
            selected_categories,
            show_category_hint: self.category_hint,
        }
    }

    fn behavior(&self) -> Behavior {
        Behavior::new(self.early_vote, self.accuracy, self.wolf_accuracy)
    }
}

fn generated_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("Giocatore {i}")).collect()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default; RUST_LOG still wins when set.
    let default_level = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let engine_config = EngineConfig::from_env()?;
    let settings = args.settings();
    settings.validate()?;
    let behavior = args.behavior();

    let runtime = if args.realtime {
        Some(
            tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?,
        )
    } else {
        None
    };
    let period = args
        .tick_ms
        .map(Duration::from_millis)
        .unwrap_or(engine_config.tick_period);

    if args.show_output {
        info!(
            games = args.games,
            players = settings.player_count(),
            mode = ?settings.mode,
            enemies = ?settings.enemy_config,
            realtime = args.realtime,
            "Starting impostor simulator"
        );
    }

    let mut output_writer = OutputWriter::new(&args.output_dir, args.output_format.clone(), args.compress)?;
    if args.show_output {
        info!("Output directory: {}", args.output_dir.display());
    }

    let base_seed = args.seed.or(engine_config.seed);
    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let game_seed = match base_seed {
            Some(seed) => seed.wrapping_add(u64::from(game_num)),
            None => rand::random(),
        };

        let simulator = Simulator::new(settings.clone(), behavior, game_seed);
        let game_res: Result<GameResult, SimulatorError> = match &runtime {
            Some(rt) => rt.block_on(simulator.simulate_game_realtime(period)),
            None => simulator.simulate_game(),
        };

        match game_res {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let config = GameConfig {
                    mode: settings.mode,
                    players: settings.player_names.clone(),
                    total_rounds: settings.total_rounds,
                    enemy_config: settings.enemy_config,
                    timer_secs: settings.timer_duration_secs,
                    behavior,
                    total_games: args.games,
                };
                let metrics = build_game_metrics(game_num, config, &result, duration_ms);
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(
                        game = game_num,
                        rounds = result.rounds.len(),
                        champion = ?metrics.result.champion,
                        "Game completed"
                    );
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (detail_path, csv_path) = output_writer.output_paths();
    let (detail_path, csv_path) = (detail_path.to_path_buf(), csv_path.to_path_buf());
    output_writer.finish()?;

    if args.show_output {
        info!("Detailed results written to: {}", detail_path.display());
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let mut tally = WinTally::default();
    let mut finals = 0;
    for result in results {
        result.rounds.iter().for_each(|r| tally.record(r));
        if result.played_final() {
            finals += 1;
        }
    }

    let rounds = tally.total().max(1) as f64;
    let pct = |n: u32| n as f64 / rounds * 100.0;
    println!("\n=== Round Winners ({} rounds) ===", tally.total());
    println!("Players:  {} ({:.1}%)", tally.players, pct(tally.players));
    println!("Impostor: {} ({:.1}%)", tally.impostor, pct(tally.impostor));
    println!("Mr. Wolf: {} ({:.1}%)", tally.mr_wolf, pct(tally.mr_wolf));
    println!("Enemies:  {} ({:.1}%)", tally.enemies, pct(tally.enemies));
    println!("Won by word guess: {}", tally.by_guess);
    println!("Sessions with a final: {}/{}", finals, results.len());
}
