#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod services;


// Re-exports for public API
pub use config::EngineConfig;
pub use domain::{
    EnemyConfig, GameMode, Phase, PlayerId, RevealCard, RevealProgress, Role, RoundSnapshot,
    Settings, Tick, WinMethod, Winner,
};
pub use errors::{ConfigError, DomainError, ValidationKind};
pub use services::{spawn_round_clock, GameSession, RoundClock, SessionSnapshot, Stage};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
