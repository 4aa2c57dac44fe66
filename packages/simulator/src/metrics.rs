//! Metrics collection and output for simulation results.

use serde::Serialize;

use impostor_engine::{EnemyConfig, GameMode, Role, WinMethod, Winner};

use crate::simulator::{GameResult, RoundRecord};
use crate::types::Behavior;

/// Complete session metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    pub rounds: Vec<RoundMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub mode: GameMode,
    pub players: Vec<String>,
    pub total_rounds: u32,
    pub enemy_config: EnemyConfig,
    pub timer_secs: u32,
    pub behavior: Behavior,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub rounds_played: usize,
    pub played_final: bool,
    /// Top of the final standings (first in lobby order on a tie).
    pub champion: Option<String>,
    pub final_standings: Vec<StandingMetrics>,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingMetrics {
    pub rank: usize,
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundMetrics {
    pub round_no: u32,
    pub is_final_round: bool,
    pub enemy_config: EnemyConfig,
    pub word: String,
    pub category: String,
    pub impostor: Option<String>,
    pub mr_wolf: Option<String>,
    pub discussion_secs: u32,
    pub early_vote: bool,
    pub accused: String,
    pub accused_role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wolf_guessed: Option<bool>,
    pub winner: Winner,
    pub method: WinMethod,
    /// Points awarded this round, by player name.
    pub awarded: Vec<(String, u32)>,
}

/// Build metrics from a finished session.
pub fn build_game_metrics(
    game_id: u32,
    config: GameConfig,
    result: &GameResult,
    duration_ms: f64,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let rounds = result.rounds.iter().map(build_round_metrics).collect();

    let final_standings: Vec<StandingMetrics> = result
        .final_standings
        .iter()
        .enumerate()
        .map(|(i, (_, name, score))| StandingMetrics {
            rank: i + 1,
            name: name.clone(),
            score: *score,
        })
        .collect();

    GameMetrics {
        game_id,
        seed: result.session_seed,
        timestamp,
        config,
        result: GameResultMetrics {
            rounds_played: result.rounds.len(),
            played_final: result.played_final(),
            champion: final_standings.first().map(|s| s.name.clone()),
            final_standings,
            duration_ms,
        },
        rounds,
    }
}

fn build_round_metrics(round: &RoundRecord) -> RoundMetrics {
    let name_of = |id| {
        round
            .seats
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_default()
    };
    let holder = |role| {
        round
            .seats
            .iter()
            .find(|s| s.role == role)
            .map(|s| s.name.clone())
    };

    RoundMetrics {
        round_no: round.round_number,
        is_final_round: round.is_final_round,
        enemy_config: round.enemy_config,
        word: round.word.clone(),
        category: round.category.clone(),
        impostor: holder(Role::Impostor),
        mr_wolf: holder(Role::MrWolf),
        discussion_secs: round.discussion_secs,
        early_vote: round.early_vote,
        accused: name_of(round.accused),
        accused_role: round.accused_role,
        wolf_guessed: round.wolf_guessed,
        winner: round.outcome.winner,
        method: round.outcome.method,
        awarded: round
            .score_deltas
            .iter()
            .filter(|(_, d)| *d > 0)
            .map(|(id, d)| (name_of(*id), *d))
            .collect(),
    }
}

/// Per-winner round counts across a set of sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WinTally {
    pub players: u32,
    pub impostor: u32,
    pub mr_wolf: u32,
    pub enemies: u32,
    pub by_guess: u32,
}

impl WinTally {
    pub fn record(&mut self, round: &RoundRecord) {
        match round.outcome.winner {
            Winner::Players => self.players += 1,
            Winner::Impostor => self.impostor += 1,
            Winner::MrWolf => self.mr_wolf += 1,
            Winner::Enemies => self.enemies += 1,
        }
        if round.outcome.method == WinMethod::Guess {
            self.by_guess += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.players + self.impostor + self.mr_wolf + self.enemies
    }
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub rounds_played: usize,
    pub played_final: bool,
    pub champion: String,
    pub champion_score: u32,
    pub players_wins: u32,
    pub impostor_wins: u32,
    pub wolf_wins: u32,
    pub enemies_wins: u32,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        let count = |w: Winner| metrics.rounds.iter().filter(|r| r.winner == w).count() as u32;
        let top = metrics.result.final_standings.first();
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            rounds_played: metrics.result.rounds_played,
            played_final: metrics.result.played_final,
            champion: top.map(|s| s.name.clone()).unwrap_or_default(),
            champion_score: top.map(|s| s.score).unwrap_or(0),
            players_wins: count(Winner::Players),
            impostor_wins: count(Winner::Impostor),
            wolf_wins: count(Winner::MrWolf),
            enemies_wins: count(Winner::Enemies),
        }
    }
}
