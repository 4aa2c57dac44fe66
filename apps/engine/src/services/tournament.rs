//! Tournament bookkeeping: round counter, used words, standings and finals.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, warn};

use crate::domain::round::{RoundPlan, RoundSession};
use crate::domain::scoring::compute_scores;
use crate::domain::settings::{GameMode, Settings};
use crate::domain::snapshot::{LeaderboardEntry, LeaderboardView, QualificationMarker};
use crate::domain::state::{Phase, RosterEntry};
use crate::errors::domain::DomainError;

/// Players seated in a final round.
pub const FINALISTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tournament {
    mode: GameMode,
    total_rounds: u32,
    /// Rounds started so far, finals included.
    current_round: u32,
    /// The latest round started was the final.
    is_final_round: bool,
    /// Cumulative scores in lobby order.
    standings: Vec<RosterEntry>,
    used_words: BTreeSet<String>,
}

impl Tournament {
    /// Fresh tournament with every score at zero.
    pub fn new(settings: &Settings) -> Self {
        let standings = settings
            .player_names
            .iter()
            .enumerate()
            .map(|(i, name)| RosterEntry::new(i as u32, name.trim()))
            .collect();
        Self {
            mode: settings.mode,
            total_rounds: settings.total_rounds,
            current_round: 0,
            is_final_round: false,
            standings,
            used_words: BTreeSet::new(),
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn is_final_round(&self) -> bool {
        self.is_final_round
    }

    pub fn standings(&self) -> &[RosterEntry] {
        &self.standings
    }

    pub fn used_words(&self) -> &BTreeSet<String> {
        &self.used_words
    }

    /// Regular rounds this mode plays; a single game is one round.
    fn regular_rounds(&self) -> u32 {
        match self.mode {
            GameMode::Single => 1,
            GameMode::Tournament => self.total_rounds,
        }
    }

    fn regular_rounds_done(&self) -> bool {
        self.current_round >= self.regular_rounds()
    }

    pub fn can_play_final(&self) -> bool {
        self.mode == GameMode::Tournament
            && self.regular_rounds_done()
            && !self.is_final_round
            && self.standings.len() > FINALISTS
    }

    /// No further round may start; only a restart is accepted.
    pub fn is_over(&self) -> bool {
        self.regular_rounds_done() && (self.is_final_round || !self.can_play_final())
    }

    /// Plan the next regular round with the full roster.
    pub fn start_next_round(&mut self, settings: &Settings) -> Result<RoundPlan, DomainError> {
        if self.regular_rounds_done() {
            warn!(
                current_round = self.current_round,
                total_rounds = self.regular_rounds(),
                "No regular rounds left"
            );
            return Err(if self.is_over() {
                DomainError::TournamentOver
            } else {
                DomainError::invalid_transition("regular rounds are exhausted")
            });
        }
        self.current_round += 1;
        debug!(round = self.current_round, "Planning regular round");
        Ok(RoundPlan::from_settings(settings, self.standings.clone())
            .round(self.current_round)
            .with_used_words(self.used_words.clone()))
    }

    /// Plan the final: top four by score, ties kept in lobby order,
    /// impostor only.
    pub fn start_final_round(&mut self, settings: &Settings) -> Result<RoundPlan, DomainError> {
        if !self.can_play_final() {
            warn!(
                current_round = self.current_round,
                players = self.standings.len(),
                "Final round not available"
            );
            return Err(if self.is_over() {
                DomainError::TournamentOver
            } else {
                DomainError::invalid_transition("final round is not available")
            });
        }
        let finalists: Vec<RosterEntry> = self
            .ranked()
            .into_iter()
            .take(FINALISTS)
            .cloned()
            .collect();

        self.current_round += 1;
        self.is_final_round = true;
        info!(
            round = self.current_round,
            finalists = ?finalists.iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
            "Final round"
        );
        Ok(RoundPlan::from_settings(settings, finalists)
            .round(self.current_round)
            .with_used_words(self.used_words.clone())
            .final_round())
    }

    /// Fold a resolved round into the standings and the used-word set.
    pub fn record_round(&mut self, round: &RoundSession) -> Result<(), DomainError> {
        let outcome = round.outcome().ok_or_else(|| {
            warn!(round = round.round_number(), phase = ?round.phase(), "Recording an unresolved round");
            DomainError::phase_mismatch(Phase::Result, round.phase())
        })?;

        let scored = compute_scores(round.players(), outcome, round.is_final_round(), self.mode);
        for player in &scored {
            if let Some(entry) = self.standings.iter_mut().find(|e| e.id == player.id) {
                entry.score = player.score;
            }
        }
        self.used_words.extend(round.used_words().iter().cloned());

        info!(
            round = round.round_number(),
            is_final = round.is_final_round(),
            winner = ?outcome.winner,
            standings = ?self.standings.iter().map(|e| (e.name.as_str(), e.score)).collect::<Vec<_>>(),
            "Round recorded"
        );
        Ok(())
    }

    /// Standings by score, highest first; ties keep lobby order.
    pub fn ranked(&self) -> Vec<&RosterEntry> {
        let mut ranked: Vec<&RosterEntry> = self.standings.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    pub fn leaderboard(&self) -> LeaderboardView {
        let can_play_final = self.can_play_final();
        let entries = self
            .ranked()
            .into_iter()
            .enumerate()
            .map(|(i, e)| LeaderboardEntry {
                rank: i + 1,
                id: e.id,
                name: e.name.clone(),
                score: e.score,
                marker: can_play_final.then_some(if i < FINALISTS {
                    QualificationMarker::Qualified
                } else {
                    QualificationMarker::Eliminated
                }),
            })
            .collect();
        LeaderboardView {
            current_round: self.current_round,
            total_rounds: self.regular_rounds(),
            is_final_round: self.is_final_round,
            entries,
            can_play_final,
            is_tournament_over: self.is_over(),
        }
    }

    /// Apply edited settings between rounds. Scores follow players by name.
    ///
    /// A terminated tournament takes no edits. The round count is frozen once
    /// the final has been played and can never drop below the rounds played.
    pub fn reseat(&mut self, settings: &Settings) -> Result<(), DomainError> {
        if self.is_over() {
            return Err(DomainError::TournamentOver);
        }
        if self.is_final_round && settings.total_rounds != self.total_rounds {
            return Err(DomainError::invalid_transition(
                "round count cannot change after the final",
            ));
        }
        if self.mode == GameMode::Tournament && settings.total_rounds < self.current_round {
            return Err(DomainError::invalid_transition(format!(
                "{} rounds already played, cannot shorten to {}",
                self.current_round, settings.total_rounds
            )));
        }
        self.standings = carry_scores(&self.standings, &settings.player_names);
        self.total_rounds = settings.total_rounds;
        debug!(
            players = self.standings.len(),
            total_rounds = self.total_rounds,
            "Tournament reseated"
        );
        Ok(())
    }
}

/// New roster for `names` with scores carried from `previous`.
///
/// Ids follow the new lobby order. A player keeps their score when a previous
/// entry has the same (trimmed) name at the same occurrence among equal
/// names; anyone else starts at zero.
pub fn carry_scores(previous: &[RosterEntry], names: &[String]) -> Vec<RosterEntry> {
    let mut by_name: HashMap<&str, Vec<u32>> = HashMap::new();
    for entry in previous {
        by_name.entry(entry.name.trim()).or_default().push(entry.score);
    }

    let mut seen: HashMap<&str, usize> = HashMap::new();
    names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let name = name.trim();
            let occurrence = seen.entry(name).or_default();
            let score = by_name
                .get(name)
                .and_then(|scores| scores.get(*occurrence))
                .copied()
                .unwrap_or(0);
            *occurrence += 1;
            RosterEntry::new(i as u32, name).with_score(score)
        })
        .collect()
}
