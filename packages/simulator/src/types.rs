//! Shared types for the simulator.

use clap::ValueEnum;
use impostor_engine::{EnemyConfig, GameMode};
use serde::Serialize;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Jsonl,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Single,
    Tournament,
}

impl From<ModeArg> for GameMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Single => GameMode::Single,
            ModeArg::Tournament => GameMode::Tournament,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnemiesArg {
    Impostor,
    Wolf,
    Both,
}

impl From<EnemiesArg> for EnemyConfig {
    fn from(arg: EnemiesArg) -> Self {
        match arg {
            EnemiesArg::Impostor => EnemyConfig::ImpostorOnly,
            EnemiesArg::Wolf => EnemyConfig::WolfOnly,
            EnemiesArg::Both => EnemyConfig::Both,
        }
    }
}

/// How the simulated table plays. Probabilities are clamped to `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Behavior {
    /// Chance the group calls the vote before time runs out.
    pub early_vote: f64,
    /// Chance the accusation lands on an enemy.
    pub accuse_accuracy: f64,
    /// Chance a caught Mr. Wolf names the word.
    pub wolf_guess_accuracy: f64,
}

impl Behavior {
    pub fn new(early_vote: f64, accuse_accuracy: f64, wolf_guess_accuracy: f64) -> Self {
        Self {
            early_vote: early_vote.clamp(0.0, 1.0),
            accuse_accuracy: accuse_accuracy.clamp(0.0, 1.0),
            wolf_guess_accuracy: wolf_guess_accuracy.clamp(0.0, 1.0),
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::new(0.5, 0.5, 0.2)
    }
}
