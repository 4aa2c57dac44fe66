//! Domain layer: pure round logic, no clocks and no I/O.

pub mod roles;
pub mod round;
pub mod scoring;
pub mod seed_derivation;
pub mod settings;
pub mod shuffle;
pub mod snapshot;
pub mod state;
pub mod timer;
pub mod words;

#[cfg(test)]
mod test_prelude;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_snapshot;

// Re-exports for ergonomics
pub use roles::{assign_roles, EnemyConfig, Role, RoleAssignment};
pub use round::{RevealProgress, RoundPlan, RoundSession};
pub use scoring::{compute_scores, points_for, score_deltas};
pub use seed_derivation::derive_round_seed;
pub use settings::{GameMode, Settings};
pub use snapshot::{
    LeaderboardEntry, LeaderboardView, QualificationMarker, RevealCard, RoundSnapshot,
};
pub use state::{Phase, Player, PlayerId, RosterEntry, RoundOutcome, WinMethod, Winner};
pub use timer::{format_clock, Countdown, Tick, TimerState};
pub use words::{select_word, WordPick, CATEGORIES};
