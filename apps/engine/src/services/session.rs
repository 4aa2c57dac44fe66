//! The game session: single owner of settings, the active round and the
//! tournament. Every inbound UI call lands here.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::domain::round::{RevealProgress, RoundPlan, RoundSession};
use crate::domain::seed_derivation::derive_round_seed;
use crate::domain::settings::{GameMode, Settings};
use crate::domain::snapshot::{LeaderboardView, RevealCard, RoundSnapshot};
use crate::domain::state::{Phase, PlayerId, RoundOutcome};
use crate::domain::timer::Tick;
use crate::errors::domain::DomainError;
use crate::services::tournament::Tournament;

/// Where the session is between rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Lobby,
    InRound,
    Leaderboard,
    /// Terminal until `restart`.
    Finished,
}

/// Everything a screen needs, in one serializable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub settings: Settings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<RoundSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_card: Option<RevealCard>,
    pub leaderboard: LeaderboardView,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    settings: Settings,
    seed: u64,
    /// Bumped by every restart so replays deal fresh rounds.
    epoch: u32,
    stage: Stage,
    round: Option<RoundSession>,
    /// Bumped whenever a round is installed or torn down; a clock only ticks
    /// the generation it was spawned for.
    round_generation: u64,
    /// The active round's result is already in the standings.
    round_recorded: bool,
    tournament: Tournament,
}

impl GameSession {
    /// Session with an OS-drawn seed.
    pub fn new(settings: Settings) -> Self {
        Self::with_seed(settings, rand::random())
    }

    /// Session whose rounds replay identically for the same seed.
    pub fn with_seed(settings: Settings, seed: u64) -> Self {
        let tournament = Tournament::new(&settings);
        debug!(seed, "Game session created");
        Self {
            settings,
            seed,
            epoch: 0,
            stage: Stage::Lobby,
            round: None,
            round_generation: 0,
            round_recorded: false,
            tournament,
        }
    }

    pub fn from_config(settings: Settings, config: &EngineConfig) -> Self {
        match config.seed {
            Some(seed) => Self::with_seed(settings, seed),
            None => Self::new(settings),
        }
    }

    // ----- read access -----

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> Option<&RoundSession> {
        self.round.as_ref()
    }

    pub fn round_generation(&self) -> u64 {
        self.round_generation
    }

    pub fn round_phase(&self) -> Option<Phase> {
        self.round.as_ref().map(RoundSession::phase)
    }

    pub fn tournament(&self) -> &Tournament {
        &self.tournament
    }

    pub fn round_snapshot(&self) -> Option<RoundSnapshot> {
        self.round.as_ref().map(RoundSnapshot::of)
    }

    /// Card of the player currently revealing, while it is showing.
    pub fn reveal_card(&self) -> Option<RevealCard> {
        let round = self.round.as_ref()?;
        let (index, visible) = round.reveal_position();
        if !visible {
            return None;
        }
        let player = round.current_revealer()?;
        Some(RevealCard::for_player(round, player, index + 1))
    }

    pub fn leaderboard(&self) -> LeaderboardView {
        self.tournament.leaderboard()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.stage,
            settings: self.settings.clone(),
            round: self.round_snapshot(),
            reveal_card: self.reveal_card(),
            leaderboard: self.leaderboard(),
        }
    }

    // ----- lobby -----

    /// Replace the settings. Allowed in the lobby (validated on start) and on
    /// the leaderboard (validated now; scores follow players by name) until
    /// the tournament is over.
    pub fn update_settings(&mut self, settings: Settings) -> Result<(), DomainError> {
        match self.stage {
            Stage::Lobby => {
                self.tournament = Tournament::new(&settings);
                self.settings = settings;
                debug!("Settings updated in lobby");
                Ok(())
            }
            Stage::Leaderboard => {
                if self.tournament.is_over() {
                    return Err(self.reject_finished("update_settings"));
                }
                settings.validate()?;
                if settings.mode != self.tournament.mode() {
                    warn!(from = ?self.tournament.mode(), to = ?settings.mode, "Mode change mid-tournament");
                    return Err(DomainError::invalid_transition(
                        "game mode cannot change during a tournament",
                    ));
                }
                if let Err(err) = self.tournament.reseat(&settings) {
                    warn!(error = %err, "Settings rejected between rounds");
                    return Err(err);
                }
                self.settings = settings;
                debug!("Settings updated between rounds");
                Ok(())
            }
            Stage::InRound => Err(self.reject("update_settings", "settings are locked during a round")),
            Stage::Finished => Err(self.reject_finished("update_settings")),
        }
    }

    /// Validate the settings and start the first round.
    pub fn start_game(&mut self) -> Result<RoundSnapshot, DomainError> {
        match self.stage {
            Stage::Lobby => {}
            Stage::Finished => return Err(self.reject_finished("start_game")),
            _ => return Err(self.reject("start_game", "game already started")),
        }
        if let Err(err) = self.settings.validate() {
            warn!(error = %err, "Settings rejected");
            return Err(err);
        }

        let mut tournament = Tournament::new(&self.settings);
        let plan = tournament.start_next_round(&self.settings)?;
        let round = self.deal(plan)?;
        self.tournament = tournament;
        self.install(round);

        info!(
            mode = ?self.settings.mode,
            players = self.settings.player_count(),
            total_rounds = self.settings.total_rounds,
            enemy_config = ?self.settings.enemy_config,
            "Game started"
        );
        self.current_snapshot()
    }

    // ----- round calls -----

    pub fn reveal_current(&mut self) -> Result<RevealCard, DomainError> {
        let round = self.round_mut()?;
        let (index, _) = round.reveal_position();
        let player = round.reveal_current()?.clone();
        Ok(RevealCard::for_player(round, &player, index + 1))
    }

    pub fn acknowledge_reveal(&mut self) -> Result<RevealProgress, DomainError> {
        self.round_mut()?.acknowledge_reveal()
    }

    pub fn tick(&mut self) -> Result<Tick, DomainError> {
        self.round_mut()?.tick()
    }

    pub fn request_vote(&mut self) -> Result<(), DomainError> {
        self.round_mut()?.request_vote()
    }

    pub fn advance_turn(&mut self) -> Result<PlayerId, DomainError> {
        Ok(self.round_mut()?.advance_turn()?.id)
    }

    pub fn cast_vote(&mut self, accused: PlayerId) -> Result<Phase, DomainError> {
        let phase = self.round_mut()?.cast_vote(accused)?;
        self.record_if_resolved()?;
        Ok(phase)
    }

    pub fn resolve_wolf_guess(&mut self, correct: bool) -> Result<RoundOutcome, DomainError> {
        let outcome = self.round_mut()?.resolve_wolf_guess(correct)?;
        self.record_if_resolved()?;
        Ok(outcome)
    }

    pub fn submit_wolf_guess(&mut self, guess: &str) -> Result<bool, DomainError> {
        let correct = self.round_mut()?.submit_wolf_guess(guess)?;
        self.record_if_resolved()?;
        Ok(correct)
    }

    // ----- between rounds -----

    /// Move on from a resolved round, or from the leaderboard.
    ///
    /// A single game finishes after its round. A tournament shows the
    /// leaderboard after every round, then starts the next regular round, the
    /// final when one is due, or finishes.
    pub fn advance_tournament(&mut self) -> Result<Stage, DomainError> {
        match self.stage {
            Stage::Lobby => Err(self.reject("advance_tournament", "game has not started")),
            Stage::Finished => Err(self.reject_finished("advance_tournament")),
            Stage::InRound => {
                let phase = self.round_phase().ok_or(DomainError::NoActiveRound)?;
                if phase != Phase::Result {
                    warn!(phase = ?phase, "Advance before the round is resolved");
                    return Err(DomainError::phase_mismatch(Phase::Result, phase));
                }
                self.stage = match self.tournament.mode() {
                    GameMode::Single => Stage::Finished,
                    GameMode::Tournament => Stage::Leaderboard,
                };
                if self.stage == Stage::Finished {
                    info!("Game finished");
                }
                debug!(stage = ?self.stage, "Stage advanced");
                Ok(self.stage)
            }
            Stage::Leaderboard => {
                let plan = if self.tournament.is_over() {
                    self.stage = Stage::Finished;
                    info!(
                        standings = ?self.tournament.ranked().iter().map(|e| (e.name.as_str(), e.score)).collect::<Vec<_>>(),
                        "Tournament finished"
                    );
                    return Ok(self.stage);
                } else if self.tournament.can_play_final() {
                    self.tournament.start_final_round(&self.settings)?
                } else {
                    self.tournament.start_next_round(&self.settings)?
                };
                let round = self.deal(plan)?;
                self.install(round);
                Ok(self.stage)
            }
        }
    }

    /// Tear down the active round, zero every score and return to the lobby.
    pub fn restart(&mut self) {
        if let Some(mut round) = self.round.take() {
            round.tear_down();
        }
        self.epoch = self.epoch.wrapping_add(1);
        self.round_generation = self.round_generation.wrapping_add(1);
        self.round_recorded = false;
        self.tournament = Tournament::new(&self.settings);
        self.stage = Stage::Lobby;
        info!(epoch = self.epoch, "Session restarted");
    }

    // ----- internals -----

    fn deal(&self, plan: RoundPlan) -> Result<RoundSession, DomainError> {
        let seed = derive_round_seed(self.seed, self.epoch, plan.round_number, plan.is_final_round);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        RoundSession::start(plan, &mut rng)
    }

    fn install(&mut self, round: RoundSession) {
        if let Some(mut previous) = self.round.replace(round) {
            previous.tear_down();
        }
        self.round_generation = self.round_generation.wrapping_add(1);
        self.round_recorded = false;
        self.stage = Stage::InRound;
    }

    fn current_snapshot(&self) -> Result<RoundSnapshot, DomainError> {
        self.round_snapshot().ok_or(DomainError::NoActiveRound)
    }

    fn round_mut(&mut self) -> Result<&mut RoundSession, DomainError> {
        match self.round.as_mut() {
            Some(round) => Ok(round),
            None => {
                warn!(stage = ?self.stage, "Round call without an active round");
                Err(DomainError::NoActiveRound)
            }
        }
    }

    fn record_if_resolved(&mut self) -> Result<(), DomainError> {
        if self.round_recorded {
            return Ok(());
        }
        if let Some(round) = self.round.as_ref().filter(|r| r.phase() == Phase::Result) {
            self.tournament.record_round(round)?;
            self.round_recorded = true;
        }
        Ok(())
    }

    fn reject(&self, op: &'static str, detail: &str) -> DomainError {
        warn!(op, stage = ?self.stage, "Rejected session call");
        DomainError::invalid_transition(detail)
    }

    fn reject_finished(&self, op: &'static str) -> DomainError {
        warn!(op, "Call after the game finished");
        DomainError::TournamentOver
    }
}
