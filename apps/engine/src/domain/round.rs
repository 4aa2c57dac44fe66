//! A single round: reveal, discussion, vote, optional wolf guess, result.
//!
//! Every transition checks its phase first and leaves the round untouched
//! when it refuses. The round never reads a clock; `tick()` is driven from
//! outside.

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::domain::roles::{assign_roles, EnemyConfig, Role};
use crate::domain::settings::Settings;
use crate::domain::state::{
    find_player, players_with_role, Phase, Player, PlayerId, RosterEntry, RoundOutcome,
    WinMethod, Winner,
};
use crate::domain::timer::{Countdown, Tick};
use crate::domain::words::select_word;
use crate::errors::domain::DomainError;
use crate::logging::Hidden;

/// Everything needed to start a round, frozen from settings and tournament state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPlan {
    /// Lobby order; the round shuffles its own turn order.
    pub roster: Vec<RosterEntry>,
    /// Requested config; see `effective_enemy_config`.
    pub enemy_config: EnemyConfig,
    pub categories: BTreeSet<String>,
    pub timer_duration_secs: u32,
    pub round_number: u32,
    pub is_final_round: bool,
    pub used_words: BTreeSet<String>,
    pub show_category_hint: bool,
}

impl RoundPlan {
    /// First regular round for `roster` under `settings`.
    pub fn from_settings(settings: &Settings, roster: Vec<RosterEntry>) -> Self {
        Self {
            roster,
            enemy_config: settings.enemy_config,
            categories: settings.selected_categories.clone(),
            timer_duration_secs: settings.timer_duration_secs,
            round_number: 1,
            is_final_round: false,
            used_words: BTreeSet::new(),
            show_category_hint: settings.show_category_hint,
        }
    }

    pub fn round(mut self, round_number: u32) -> Self {
        self.round_number = round_number;
        self
    }

    pub fn with_used_words(mut self, used_words: BTreeSet<String>) -> Self {
        self.used_words = used_words;
        self
    }

    /// Finals: flagged final and always impostor-only.
    pub fn final_round(mut self) -> Self {
        self.is_final_round = true;
        self.enemy_config = EnemyConfig::ImpostorOnly;
        self
    }

    /// The config the round will play with for this roster size.
    pub fn effective_enemy_config(&self) -> EnemyConfig {
        self.enemy_config.effective_for(self.roster.len())
    }
}

/// What happened after a reveal acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealProgress {
    /// The next player in turn order should take the device.
    Next { player_id: PlayerId },
    /// Everyone has seen their card; discussion has started.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct RevealCursor {
    index: usize,
    card_visible: bool,
}

/// Authoritative state of one round.
#[derive(Clone)]
pub struct RoundSession {
    secret_word: String,
    word_category: String,
    /// Turn order, which is also the reveal order.
    players: Vec<Player>,
    round_number: u32,
    is_final_round: bool,
    enemy_config: EnemyConfig,
    /// Words used so far in the tournament, this round's included.
    used_words: BTreeSet<String>,
    show_category_hint: bool,
    phase: Phase,
    reveal: RevealCursor,
    timer: Countdown,
    turn_index: usize,
    voted_player: Option<PlayerId>,
    outcome: Option<RoundOutcome>,
}

/// The word (and the used-word set that contains it) stay masked until the
/// result is in.
impl fmt::Debug for RoundSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("RoundSession");
        if self.phase == Phase::Result {
            d.field("secret_word", &self.secret_word)
                .field("used_words", &self.used_words);
        } else {
            d.field("secret_word", &Hidden(&self.secret_word))
                .field("used_words", &self.used_words.len());
        }
        d.field("word_category", &self.word_category)
            .field("players", &self.players)
            .field("round_number", &self.round_number)
            .field("is_final_round", &self.is_final_round)
            .field("enemy_config", &self.enemy_config)
            .field("show_category_hint", &self.show_category_hint)
            .field("phase", &self.phase)
            .field("reveal", &self.reveal)
            .field("timer", &self.timer)
            .field("turn_index", &self.turn_index)
            .field("voted_player", &self.voted_player)
            .field("outcome", &self.outcome)
            .finish()
    }
}

impl RoundSession {
    /// Draw the word, deal roles and seat everyone; the round opens in `Reveal`.
    pub fn start<R: Rng + ?Sized>(plan: RoundPlan, rng: &mut R) -> Result<Self, DomainError> {
        let enemy_config = plan.effective_enemy_config();
        if enemy_config != plan.enemy_config {
            debug!(
                requested = ?plan.enemy_config,
                players = plan.roster.len(),
                "Too few players for both enemies; playing impostor only"
            );
        }

        let pick = select_word(&plan.categories, &plan.used_words, rng)?;
        let assignment = assign_roles(plan.roster.len(), enemy_config, rng);

        let players: Vec<Player> = assignment
            .turn_order()
            .iter()
            .map(|&idx| {
                let entry = &plan.roster[idx];
                Player {
                    id: entry.id,
                    name: entry.name.clone(),
                    role: assignment.roles()[idx],
                    score: entry.score,
                }
            })
            .collect();

        let mut used_words = plan.used_words;
        used_words.insert(pick.word.clone());

        info!(
            round = plan.round_number,
            is_final = plan.is_final_round,
            players = players.len(),
            enemy_config = ?enemy_config,
            word = %Hidden(&pick.word),
            category = %pick.category,
            "Round started"
        );
        debug!(round = plan.round_number, "Transition: -> Reveal");

        Ok(Self {
            secret_word: pick.word,
            word_category: pick.category,
            players,
            round_number: plan.round_number,
            is_final_round: plan.is_final_round,
            enemy_config,
            used_words,
            show_category_hint: plan.show_category_hint,
            phase: Phase::Reveal,
            reveal: RevealCursor::default(),
            timer: Countdown::new(plan.timer_duration_secs),
            turn_index: 0,
            voted_player: None,
            outcome: None,
        })
    }

    // ----- read access -----

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn word_category(&self) -> &str {
        &self.word_category
    }

    /// Players in turn order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        find_player(&self.players, id)
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn is_final_round(&self) -> bool {
        self.is_final_round
    }

    pub fn enemy_config(&self) -> EnemyConfig {
        self.enemy_config
    }

    pub fn used_words(&self) -> &BTreeSet<String> {
        &self.used_words
    }

    pub fn show_category_hint(&self) -> bool {
        self.show_category_hint
    }

    pub fn timer(&self) -> &Countdown {
        &self.timer
    }

    pub fn voted_player(&self) -> Option<&Player> {
        self.voted_player.and_then(|id| self.player(id))
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<Winner> {
        self.outcome.map(|o| o.winner)
    }

    pub fn win_method(&self) -> Option<WinMethod> {
        self.outcome.map(|o| o.method)
    }

    /// Enemy players, resolved by role.
    pub fn enemies(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.role.is_enemy())
    }

    pub fn holders_of(&self, role: Role) -> impl Iterator<Item = &Player> {
        players_with_role(&self.players, role)
    }

    /// Player whose card is up next during `Reveal`.
    pub fn current_revealer(&self) -> Option<&Player> {
        match self.phase {
            Phase::Reveal => self.players.get(self.reveal.index),
            _ => None,
        }
    }

    /// 0-based reveal position and whether the card is currently showing.
    pub fn reveal_position(&self) -> (usize, bool) {
        (self.reveal.index, self.reveal.card_visible)
    }

    /// Display-only speaking turn during discussion.
    pub fn current_turn_player(&self) -> Option<&Player> {
        match self.phase {
            Phase::Playing => self.players.get(self.turn_index),
            _ => None,
        }
    }

    // ----- transitions -----

    fn require_phase(&self, expected: Phase, op: &'static str) -> Result<(), DomainError> {
        if self.phase == expected {
            Ok(())
        } else {
            warn!(op, expected = ?expected, found = ?self.phase, "Rejected round transition");
            Err(DomainError::phase_mismatch(expected, self.phase))
        }
    }

    /// First half of a reveal step: show the current player's card.
    ///
    /// Showing an already visible card again is allowed.
    pub fn reveal_current(&mut self) -> Result<&Player, DomainError> {
        self.require_phase(Phase::Reveal, "reveal_current")?;
        self.reveal.card_visible = true;
        let idx = self.reveal.index;
        debug!(round = self.round_number, position = idx + 1, "Card revealed");
        Ok(&self.players[idx])
    }

    /// Second half of a reveal step: the player confirms and hands the device on.
    pub fn acknowledge_reveal(&mut self) -> Result<RevealProgress, DomainError> {
        self.require_phase(Phase::Reveal, "acknowledge_reveal")?;
        if !self.reveal.card_visible {
            warn!(
                round = self.round_number,
                position = self.reveal.index + 1,
                "Acknowledge before reveal"
            );
            return Err(DomainError::invalid_transition(
                "card must be revealed before it is acknowledged",
            ));
        }

        self.reveal.index += 1;
        self.reveal.card_visible = false;

        match self.players.get(self.reveal.index) {
            Some(next) => Ok(RevealProgress::Next { player_id: next.id }),
            None => {
                self.phase = Phase::Playing;
                self.timer.start();
                debug!(
                    round = self.round_number,
                    timer_secs = self.timer.duration_secs(),
                    "Transition: Reveal -> Playing"
                );
                Ok(RevealProgress::Complete)
            }
        }
    }

    /// One second of discussion time.
    ///
    /// Reaching zero opens the vote exactly once. Ticks arriving after the
    /// round has left `Playing` are ignored; ticking before discussion has
    /// started is rejected.
    pub fn tick(&mut self) -> Result<Tick, DomainError> {
        match self.phase {
            Phase::Reveal => {
                self.require_phase(Phase::Playing, "tick")?;
                Ok(Tick::Ignored)
            }
            Phase::Playing => {
                let tick = self.timer.tick();
                if tick == Tick::Expired {
                    debug!(round = self.round_number, "Timer expired");
                    self.enter_voting();
                }
                Ok(tick)
            }
            Phase::Voting | Phase::WolfGuess | Phase::Result => Ok(Tick::Ignored),
        }
    }

    /// Move the display-only speaking turn to the next player.
    pub fn advance_turn(&mut self) -> Result<&Player, DomainError> {
        self.require_phase(Phase::Playing, "advance_turn")?;
        self.turn_index = (self.turn_index + 1) % self.players.len();
        Ok(&self.players[self.turn_index])
    }

    /// Open the vote before the timer runs out. A repeated request while the
    /// vote is already open is a no-op.
    pub fn request_vote(&mut self) -> Result<(), DomainError> {
        match self.phase {
            Phase::Playing => {
                self.enter_voting();
                Ok(())
            }
            Phase::Voting => {
                debug!(round = self.round_number, "Vote already open");
                Ok(())
            }
            _ => self.require_phase(Phase::Playing, "request_vote"),
        }
    }

    fn enter_voting(&mut self) {
        self.timer.stop();
        self.phase = Phase::Voting;
        debug!(
            round = self.round_number,
            remaining_secs = self.timer.remaining_secs(),
            "Transition: Playing -> Voting"
        );
    }

    /// Resolve the group's single accusation. Returns the phase entered:
    /// `WolfGuess` when Mr. Wolf was caught, `Result` otherwise.
    pub fn cast_vote(&mut self, accused: PlayerId) -> Result<Phase, DomainError> {
        self.require_phase(Phase::Voting, "cast_vote")?;
        let role = match self.player(accused) {
            Some(p) => p.role,
            None => {
                warn!(round = self.round_number, accused, "Vote for unknown player");
                return Err(DomainError::UnknownPlayer(accused));
            }
        };

        self.voted_player = Some(accused);
        match role {
            Role::MrWolf => {
                self.phase = Phase::WolfGuess;
                debug!(round = self.round_number, "Transition: Voting -> WolfGuess");
            }
            Role::Impostor => {
                self.finish(RoundOutcome::new(Winner::Players, WinMethod::Vote));
            }
            Role::Civilian => {
                let winner = self.enemy_config.civilian_accused_winner();
                self.finish(RoundOutcome::new(winner, WinMethod::Vote));
            }
        }
        Ok(self.phase)
    }

    /// Settle Mr. Wolf's last chance, judged by the group or by
    /// `submit_wolf_guess`.
    pub fn resolve_wolf_guess(&mut self, correct: bool) -> Result<RoundOutcome, DomainError> {
        self.require_phase(Phase::WolfGuess, "resolve_wolf_guess")?;
        let winner = if correct {
            Winner::MrWolf
        } else {
            Winner::Players
        };
        let outcome = RoundOutcome::new(winner, WinMethod::Guess);
        self.finish(outcome);
        Ok(outcome)
    }

    /// Judge a typed guess against the secret word and settle the round.
    /// Returns whether the guess was right.
    pub fn submit_wolf_guess(&mut self, guess: &str) -> Result<bool, DomainError> {
        self.require_phase(Phase::WolfGuess, "submit_wolf_guess")?;
        if guess.trim().is_empty() {
            return Err(DomainError::invalid_transition("guess must not be empty"));
        }
        let correct = guess_matches(guess, &self.secret_word);
        self.resolve_wolf_guess(correct)?;
        Ok(correct)
    }

    fn finish(&mut self, outcome: RoundOutcome) {
        self.outcome = Some(outcome);
        self.phase = Phase::Result;
        info!(
            round = self.round_number,
            winner = ?outcome.winner,
            method = ?outcome.method,
            voted = ?self.voted_player,
            word = %self.secret_word,
            "Round resolved"
        );
    }

    /// Stop the timer of a round that is being abandoned.
    pub fn tear_down(&mut self) -> bool {
        let stopped = self.timer.stop();
        debug!(round = self.round_number, phase = ?self.phase, stopped, "Round torn down");
        stopped
    }
}

/// Case- and surrounding-whitespace-insensitive comparison of a guess.
pub fn guess_matches(guess: &str, secret: &str) -> bool {
    guess.trim().to_lowercase() == secret.trim().to_lowercase()
}
