// Unit tests for error construction and display - no session state involved
use crate::domain::state::Phase;
use crate::errors::domain::{DomainError, ValidationKind};

#[test]
fn validation_carries_kind_and_detail() {
    let err = DomainError::validation(ValidationKind::TooFewPlayers, "need at least 3");
    assert_eq!(err.validation_kind(), Some(&ValidationKind::TooFewPlayers));
    assert_eq!(
        err.to_string(),
        "validation error (TooFewPlayers): need at least 3"
    );
}

#[test]
fn phase_mismatch_names_both_phases() {
    let err = DomainError::phase_mismatch(Phase::Playing, Phase::Reveal);
    assert_eq!(
        err.to_string(),
        "phase mismatch: expected Playing, found Reveal"
    );
    assert_eq!(err.validation_kind(), None);
}

#[test]
fn misuse_errors_have_stable_messages() {
    assert_eq!(DomainError::UnknownPlayer(7).to_string(), "unknown player id 7");
    assert_eq!(DomainError::NoActiveRound.to_string(), "no active round");
    assert_eq!(DomainError::TournamentOver.to_string(), "tournament is over");
    assert_eq!(
        DomainError::invalid_transition("settings are frozen").to_string(),
        "invalid transition: settings are frozen"
    );
}
