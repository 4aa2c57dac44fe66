//! Lobby settings and the validation boundary in front of `start_game`.

use std::collections::{BTreeSet, HashMap};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::domain::roles::EnemyConfig;
use crate::domain::words::{category_names, find_category, pool_size};
use crate::errors::domain::{DomainError, ValidationKind};

pub const MIN_PLAYERS: usize = 3;
pub const MAX_PLAYERS: usize = 12;
pub const TIMER_RANGE_SECS: RangeInclusive<u32> = 60..=900;
pub const ROUNDS_RANGE: RangeInclusive<u32> = 1..=20;
pub const DEFAULT_TIMER_SECS: u32 = 300;
pub const DEFAULT_TOTAL_ROUNDS: u32 = 3;
pub const INITIAL_NAMES: [&str; 3] = ["Giocatore 1", "Giocatore 2", "Giocatore 3"];

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
    #[default]
    Single,
    Tournament,
}

/// Session-wide settings, edited in the lobby and frozen per round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Lobby order; rounds shuffle their own turn order.
    pub player_names: Vec<String>,
    pub timer_duration_secs: u32,
    pub mode: GameMode,
    /// Regular rounds before a possible finals (tournament only).
    pub total_rounds: u32,
    pub enemy_config: EnemyConfig,
    pub selected_categories: BTreeSet<String>,
    /// Enemies see the word's category on their reveal card.
    pub show_category_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_names: INITIAL_NAMES.iter().map(|n| n.to_string()).collect(),
            timer_duration_secs: DEFAULT_TIMER_SECS,
            mode: GameMode::Single,
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            enemy_config: EnemyConfig::ImpostorOnly,
            selected_categories: category_names().map(str::to_string).collect(),
            show_category_hint: false,
        }
    }
}

impl Settings {
    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    /// Names that appear more than once (after trimming), for UI flagging.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &self.player_names {
            *counts.entry(name.trim()).or_default() += 1;
        }
        let mut dups: Vec<String> = counts
            .into_iter()
            .filter(|(name, count)| *count > 1 && !name.is_empty())
            .map(|(name, _)| name.to_string())
            .collect();
        dups.sort();
        dups
    }

    /// The enemy config a full-roster round will actually use.
    pub fn effective_enemy_config(&self) -> EnemyConfig {
        self.enemy_config.effective_for(self.player_count())
    }

    /// Reject configurations the core is not defined for.
    ///
    /// `EnemyConfig::Both` with fewer than five players is not an error: the
    /// round plan falls back to `ImpostorOnly`.
    pub fn validate(&self) -> Result<(), DomainError> {
        let count = self.player_count();
        if count < MIN_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::TooFewPlayers,
                format!("need at least {MIN_PLAYERS} players, got {count}"),
            ));
        }
        if count > MAX_PLAYERS {
            return Err(DomainError::validation(
                ValidationKind::TooManyPlayers,
                format!("at most {MAX_PLAYERS} players, got {count}"),
            ));
        }
        if let Some(idx) = self.player_names.iter().position(|n| n.trim().is_empty()) {
            return Err(DomainError::validation(
                ValidationKind::EmptyPlayerName,
                format!("player {} has an empty name", idx + 1),
            ));
        }
        if let Some(dup) = self.duplicate_names().into_iter().next() {
            return Err(DomainError::validation(
                ValidationKind::DuplicatePlayerName,
                format!("name '{dup}' is used more than once"),
            ));
        }
        if !TIMER_RANGE_SECS.contains(&self.timer_duration_secs) {
            return Err(DomainError::validation(
                ValidationKind::TimerOutOfRange,
                format!(
                    "timer must be {}..={} seconds, got {}",
                    TIMER_RANGE_SECS.start(),
                    TIMER_RANGE_SECS.end(),
                    self.timer_duration_secs
                ),
            ));
        }
        if self.mode == GameMode::Tournament && !ROUNDS_RANGE.contains(&self.total_rounds) {
            return Err(DomainError::validation(
                ValidationKind::InvalidRoundCount,
                format!(
                    "tournament rounds must be {}..={}, got {}",
                    ROUNDS_RANGE.start(),
                    ROUNDS_RANGE.end(),
                    self.total_rounds
                ),
            ));
        }
        if self.selected_categories.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::NoCategories,
                "select at least one category",
            ));
        }
        if let Some(unknown) = self
            .selected_categories
            .iter()
            .find(|c| find_category(c).is_none())
        {
            return Err(DomainError::validation(
                ValidationKind::UnknownCategory,
                format!("unknown category '{unknown}'"),
            ));
        }
        if pool_size(&self.selected_categories) == 0 {
            return Err(DomainError::validation(
                ValidationKind::EmptyWordPool,
                "selected categories contain no words",
            ));
        }
        Ok(())
    }
}
