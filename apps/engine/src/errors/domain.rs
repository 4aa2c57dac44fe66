//! Domain-level error type used across the engine and its callers.
//!
//! Configuration problems are reported as `Validation`; everything else is
//! transition misuse by the presentation layer. A rejected operation never
//! mutates state.

use thiserror::Error;

use crate::domain::state::{Phase, PlayerId};

/// Specific validation failures, so callers can branch without parsing text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    TooFewPlayers,
    TooManyPlayers,
    EmptyPlayerName,
    DuplicatePlayerName,
    TimerOutOfRange,
    InvalidRoundCount,
    NoCategories,
    UnknownCategory,
    EmptyWordPool,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Settings or round plan rejected before a round starts
    #[error("validation error ({0:?}): {1}")]
    Validation(ValidationKind, String),
    /// Operation called in the wrong round phase
    #[error("phase mismatch: expected {expected:?}, found {found:?}")]
    PhaseMismatch { expected: Phase, found: Phase },
    /// Player id not present in the active round
    #[error("unknown player id {0}")]
    UnknownPlayer(PlayerId),
    /// Operation not allowed in the current session stage
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    /// No round is active (never started, or torn down by a restart)
    #[error("no active round")]
    NoActiveRound,
    /// The tournament has terminated; only a restart is accepted
    #[error("tournament is over")]
    TournamentOver,
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn invalid_transition(detail: impl Into<String>) -> Self {
        Self::InvalidTransition(detail.into())
    }

    pub fn phase_mismatch(expected: Phase, found: Phase) -> Self {
        Self::PhaseMismatch { expected, found }
    }

    /// The validation kind, when this is a configuration error.
    pub fn validation_kind(&self) -> Option<&ValidationKind> {
        match self {
            Self::Validation(kind, _) => Some(kind),
            _ => None,
        }
    }
}
