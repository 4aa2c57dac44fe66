//! In-memory session simulator.
//!
//! Every session is driven only through `GameSession`, the same calls a UI
//! makes. Table decisions (when to vote, whom to accuse, what Mr. Wolf
//! guesses) come from a decision RNG seeded from the session seed, so a
//! seeded run replays exactly.

use std::sync::Arc;
use std::time::Duration;

use impostor_engine::domain::scoring::score_deltas;
use impostor_engine::domain::state::RoundOutcome;
use impostor_engine::domain::words::CATEGORIES;
use impostor_engine::services::ClockStop;
use impostor_engine::{
    spawn_round_clock, DomainError, EnemyConfig, GameSession, Phase, PlayerId, RevealProgress,
    Role, Settings, Stage, Tick,
};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::types::Behavior;

/// Keeps the decision stream apart from the engine's round streams.
const DECISION_SALT: u64 = 0x5EED_DEC1_5104_0001;

/// Errors that can occur during simulation.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("engine rejected a call: {0}")]
    Domain(#[from] DomainError),
    #[error("round clock task failed: {0}")]
    Clock(#[from] tokio::task::JoinError),
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// One seat as dealt in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
}

/// What happened in one simulated round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub round_number: u32,
    pub is_final_round: bool,
    pub enemy_config: EnemyConfig,
    pub word: String,
    pub category: String,
    /// Turn order.
    pub seats: Vec<Seat>,
    /// Seconds of discussion before the vote opened.
    pub discussion_secs: u32,
    pub early_vote: bool,
    pub accused: PlayerId,
    pub accused_role: Role,
    /// Set when Mr. Wolf was caught.
    pub wolf_guessed: Option<bool>,
    pub outcome: RoundOutcome,
    pub score_deltas: Vec<(PlayerId, u32)>,
}

/// Result of simulating a complete session.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    pub session_seed: u64,
    pub rounds: Vec<RoundRecord>,
    /// Highest score first; ties keep lobby order.
    pub final_standings: Vec<(PlayerId, String, u32)>,
}

impl GameResult {
    pub fn played_final(&self) -> bool {
        self.rounds.iter().any(|r| r.is_final_round)
    }
}

pub struct Simulator {
    settings: Settings,
    behavior: Behavior,
    session_seed: u64,
    rng: ChaCha8Rng,
}

impl Simulator {
    pub fn new(settings: Settings, behavior: Behavior, session_seed: u64) -> Self {
        Self {
            settings,
            behavior,
            session_seed,
            rng: ChaCha8Rng::seed_from_u64(session_seed ^ DECISION_SALT),
        }
    }

    /// Play a whole session, ticking the clock by hand.
    pub fn simulate_game(mut self) -> Result<GameResult, SimulatorError> {
        let mut session = GameSession::with_seed(self.settings.clone(), self.session_seed);
        session.start_game()?;

        let mut rounds = Vec::new();
        loop {
            reveal_all(&mut session)?;

            let vote_at = self.plan_discussion(session.settings().timer_duration_secs);
            let mut elapsed = 0u32;
            loop {
                if Some(elapsed) == vote_at {
                    session.request_vote()?;
                    break;
                }
                match session.tick()? {
                    Tick::Running { .. } => elapsed += 1,
                    Tick::Expired => {
                        elapsed += 1;
                        break;
                    }
                    Tick::Ignored => {
                        return Err(SimulatorError::InvalidState(
                            "discussion tick was ignored".to_string(),
                        ))
                    }
                }
            }

            rounds.push(self.resolve_round(&mut session, elapsed, vote_at.is_some())?);
            if advance(&mut session)? == Stage::Finished {
                break;
            }
        }

        Ok(self.finish(&session, rounds))
    }

    /// Play a whole session against the async round clock; one `period` is
    /// one second of game time.
    pub async fn simulate_game_realtime(
        mut self,
        period: Duration,
    ) -> Result<GameResult, SimulatorError> {
        let shared = Arc::new(Mutex::new(GameSession::with_seed(
            self.settings.clone(),
            self.session_seed,
        )));
        shared.lock().start_game()?;

        let mut rounds = Vec::new();
        loop {
            reveal_all(&mut shared.lock())?;
            let timer = shared.lock().settings().timer_duration_secs;
            let vote_at = self.plan_discussion(timer);

            let clock = spawn_round_clock(Arc::clone(&shared), period);
            if let Some(secs) = vote_at {
                tokio::time::sleep(period * secs + period / 2).await;
                shared.lock().request_vote()?;
            }
            let stop = clock.join().await?;
            debug!(?stop, "Round clock finished");

            let record = {
                let mut session = shared.lock();
                let remaining = session
                    .round()
                    .map(|r| r.timer().remaining_secs())
                    .unwrap_or(0);
                self.resolve_round(&mut session, timer - remaining, stop != ClockStop::Expired)?
            };
            rounds.push(record);

            if advance(&mut shared.lock())? == Stage::Finished {
                break;
            }
        }

        let session = shared.lock();
        Ok(self.finish(&session, rounds))
    }

    /// Seconds of discussion before an early vote, or `None` to run the clock out.
    fn plan_discussion(&mut self, timer_secs: u32) -> Option<u32> {
        if timer_secs > 0 && self.rng.random_bool(self.behavior.early_vote) {
            Some(self.rng.random_range(0..timer_secs))
        } else {
            None
        }
    }

    fn pick_accused(&mut self, seats: &[Seat]) -> Result<PlayerId, SimulatorError> {
        let (enemies, civilians): (Vec<&Seat>, Vec<&Seat>) =
            seats.iter().partition(|s| s.role.is_enemy());
        let hit_enemy = self.rng.random_bool(self.behavior.accuse_accuracy);
        let pool = if hit_enemy || civilians.is_empty() {
            enemies
        } else {
            civilians
        };
        if pool.is_empty() {
            return Err(SimulatorError::InvalidState("nobody to accuse".to_string()));
        }
        Ok(pool[self.rng.random_range(0..pool.len())].id)
    }

    fn wolf_guess(&mut self, secret: &str) -> String {
        if self.rng.random_bool(self.behavior.wolf_guess_accuracy) {
            // Sloppy casing still counts.
            return secret.to_lowercase();
        }
        let secret = secret.to_lowercase();
        let decoys: Vec<&str> = CATEGORIES
            .iter()
            .flat_map(|c| c.words.iter().copied())
            .filter(|w| w.to_lowercase() != secret)
            .collect();
        decoys[self.rng.random_range(0..decoys.len())].to_string()
    }

    fn resolve_round(
        &mut self,
        session: &mut GameSession,
        discussion_secs: u32,
        early_vote: bool,
    ) -> Result<RoundRecord, SimulatorError> {
        let (round_number, is_final_round, enemy_config, word, category, seats) = {
            let round = session.round().ok_or(DomainError::NoActiveRound)?;
            let seats: Vec<Seat> = round
                .players()
                .iter()
                .map(|p| Seat {
                    id: p.id,
                    name: p.name.clone(),
                    role: p.role,
                })
                .collect();
            (
                round.round_number(),
                round.is_final_round(),
                round.enemy_config(),
                round.secret_word().to_string(),
                round.word_category().to_string(),
                seats,
            )
        };

        let accused = self.pick_accused(&seats)?;
        let accused_role = seats
            .iter()
            .find(|s| s.id == accused)
            .map(|s| s.role)
            .ok_or(DomainError::UnknownPlayer(accused))?;

        let wolf_guessed = match session.cast_vote(accused)? {
            Phase::WolfGuess => {
                let guess = self.wolf_guess(&word);
                Some(session.submit_wolf_guess(&guess)?)
            }
            _ => None,
        };

        let round = session.round().ok_or(DomainError::NoActiveRound)?;
        let outcome = round
            .outcome()
            .ok_or_else(|| SimulatorError::InvalidState("round did not resolve".to_string()))?;
        let deltas = score_deltas(
            round.players(),
            outcome,
            is_final_round,
            session.tournament().mode(),
        );

        debug!(
            round = round_number,
            accused,
            accused_role = ?accused_role,
            winner = ?outcome.winner,
            method = ?outcome.method,
            "Simulated round"
        );

        Ok(RoundRecord {
            round_number,
            is_final_round,
            enemy_config,
            word,
            category,
            seats,
            discussion_secs,
            early_vote,
            accused,
            accused_role,
            wolf_guessed,
            outcome,
            score_deltas: deltas,
        })
    }

    fn finish(&self, session: &GameSession, rounds: Vec<RoundRecord>) -> GameResult {
        let final_standings = session
            .tournament()
            .ranked()
            .into_iter()
            .map(|e| (e.id, e.name.clone(), e.score))
            .collect();
        info!(
            seed = self.session_seed,
            rounds = rounds.len(),
            "Simulated session finished"
        );
        GameResult {
            session_seed: self.session_seed,
            rounds,
            final_standings,
        }
    }
}

/// Reveal every card, checking that no enemy card carries the word.
fn reveal_all(session: &mut GameSession) -> Result<(), SimulatorError> {
    loop {
        let card = session.reveal_current()?;
        if card.role.is_enemy() && card.word.is_some() {
            return Err(SimulatorError::InvalidState(format!(
                "enemy card for player {} shows the word",
                card.player_id
            )));
        }
        if session.acknowledge_reveal()? == RevealProgress::Complete {
            return Ok(());
        }
    }
}

/// Leave the result screen: skip past the leaderboard into the next round,
/// or stop once the session is finished.
fn advance(session: &mut GameSession) -> Result<Stage, SimulatorError> {
    let mut stage = session.advance_tournament()?;
    if stage == Stage::Leaderboard {
        stage = session.advance_tournament()?;
    }
    Ok(stage)
}
