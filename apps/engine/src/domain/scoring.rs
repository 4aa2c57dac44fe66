//! Tournament point table.

use crate::domain::roles::Role;
use crate::domain::settings::GameMode;
use crate::domain::state::{Player, PlayerId, RoundOutcome, Winner};

pub const CIVILIAN_WIN_POINTS: u32 = 100;
pub const IMPOSTOR_WIN_POINTS: u32 = 300;
pub const WOLF_WIN_POINTS: u32 = 500;
/// Each enemy's share when impostor and wolf win together.
pub const ENEMIES_WIN_POINTS: u32 = 300;
pub const FINAL_ROUND_MULTIPLIER: u32 = 2;

/// Points a player holding `role` earns for `winner`.
pub fn points_for(role: Role, winner: Winner, is_final_round: bool) -> u32 {
    let base = match (winner, role) {
        (Winner::Players, Role::Civilian) => CIVILIAN_WIN_POINTS,
        (Winner::Impostor, Role::Impostor) => IMPOSTOR_WIN_POINTS,
        (Winner::MrWolf, Role::MrWolf) => WOLF_WIN_POINTS,
        (Winner::Enemies, Role::Impostor | Role::MrWolf) => ENEMIES_WIN_POINTS,
        _ => 0,
    };
    if is_final_round {
        base * FINAL_ROUND_MULTIPLIER
    } else {
        base
    }
}

/// Per-player deltas for a resolved round, in the order of `players`.
///
/// All zero outside tournament mode.
pub fn score_deltas(
    players: &[Player],
    outcome: RoundOutcome,
    is_final_round: bool,
    mode: GameMode,
) -> Vec<(PlayerId, u32)> {
    players
        .iter()
        .map(|p| {
            let delta = match mode {
                GameMode::Tournament => points_for(p.role, outcome.winner, is_final_round),
                GameMode::Single => 0,
            };
            (p.id, delta)
        })
        .collect()
}

/// Players with their scores updated for `outcome`.
///
/// Pure: the same inputs always give the same output, and outside
/// tournament mode the players come back unchanged. The win method does not
/// change the points.
pub fn compute_scores(
    players: &[Player],
    outcome: RoundOutcome,
    is_final_round: bool,
    mode: GameMode,
) -> Vec<Player> {
    if mode != GameMode::Tournament {
        return players.to_vec();
    }
    players
        .iter()
        .map(|p| Player {
            score: p
                .score
                .saturating_add(points_for(p.role, outcome.winner, is_final_round)),
            ..p.clone()
        })
        .collect()
}
