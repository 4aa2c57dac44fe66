//! Engine configuration from the environment.

use std::env;
use std::time::Duration;

use crate::errors::config::ConfigError;

pub const SEED_VAR: &str = "IMPOSTOR_SEED";
pub const TICK_MS_VAR: &str = "IMPOSTOR_TICK_MS";
pub const DEFAULT_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fixed session seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Round clock period. One period is one second of game time.
    pub tick_period: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_period: Duration::from_millis(DEFAULT_TICK_MS),
        }
    }
}

impl EngineConfig {
    /// Read `IMPOSTOR_SEED` and `IMPOSTOR_TICK_MS`; unset means default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = match lookup(SEED_VAR) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::invalid_var(SEED_VAR, raw.clone(), e.to_string())
            })?),
            None => None,
        };

        let tick_ms = match lookup(TICK_MS_VAR) {
            Some(raw) => {
                let ms = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::invalid_var(TICK_MS_VAR, raw.clone(), e.to_string())
                })?;
                if ms == 0 {
                    return Err(ConfigError::invalid_var(TICK_MS_VAR, raw, "must be positive"));
                }
                ms
            }
            None => DEFAULT_TICK_MS,
        };

        Ok(Self {
            seed,
            tick_period: Duration::from_millis(tick_ms),
        })
    }
}
