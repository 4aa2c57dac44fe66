//! Read-only views for rendering. The secret word only leaves the engine
//! through a civilian's reveal card or a resolved round.

use serde::{Deserialize, Serialize};

use crate::domain::roles::{EnemyConfig, Role};
use crate::domain::round::RoundSession;
use crate::domain::state::{Phase, Player, PlayerId, WinMethod, Winner};
use crate::domain::timer::{format_clock, TimerState};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerView {
    pub remaining_secs: u32,
    /// `m:ss`
    pub display: String,
    pub is_low: bool,
    pub state: TimerState,
}

/// A player as everyone may see them while the round is live.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    /// Only filled once the round is resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// What a player sees on the device when it is their turn to reveal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealCard {
    pub player_id: PlayerId,
    pub player_name: String,
    pub role: Role,
    /// Civilians only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    /// Civilians always; enemies when the category hint is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// 1-based position in reveal order.
    pub position: usize,
    pub total: usize,
}

impl RevealCard {
    pub fn for_player(round: &RoundSession, player: &Player, position: usize) -> Self {
        let (word, category) = if player.role.knows_word() {
            (
                Some(round.secret_word().to_string()),
                Some(round.word_category().to_string()),
            )
        } else if round.show_category_hint() {
            (None, Some(round.word_category().to_string()))
        } else {
            (None, None)
        };
        Self {
            player_id: player.id,
            player_name: player.name.clone(),
            role: player.role,
            word,
            category,
            position,
            total: round.players().len(),
        }
    }
}

/// Result-screen facts; present once the round is resolved.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResultView {
    pub winner: Winner,
    pub method: WinMethod,
    pub word: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted_player: Option<PlayerId>,
    pub enemies: Vec<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round_number: u32,
    pub is_final_round: bool,
    pub phase: Phase,
    pub enemy_config: EnemyConfig,
    /// Turn order.
    pub players: Vec<PlayerPublic>,
    pub timer: TimerView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_revealer: Option<PlayerId>,
    /// The current revealer's card is showing.
    pub card_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RoundResultView>,
}

impl RoundSnapshot {
    pub fn of(round: &RoundSession) -> Self {
        let resolved = round.phase() == Phase::Result;
        let timer = round.timer();
        let (_, card_visible) = round.reveal_position();

        let players = round
            .players()
            .iter()
            .map(|p| PlayerPublic {
                id: p.id,
                name: p.name.clone(),
                score: p.score,
                role: resolved.then_some(p.role),
            })
            .collect();

        let result = round.outcome().map(|o| RoundResultView {
            winner: o.winner,
            method: o.method,
            word: round.secret_word().to_string(),
            category: round.word_category().to_string(),
            voted_player: round.voted_player().map(|p| p.id),
            enemies: round.enemies().map(|p| p.id).collect(),
        });

        Self {
            round_number: round.round_number(),
            is_final_round: round.is_final_round(),
            phase: round.phase(),
            enemy_config: round.enemy_config(),
            players,
            timer: TimerView {
                remaining_secs: timer.remaining_secs(),
                display: format_clock(timer.remaining_secs()),
                is_low: timer.is_low(),
                state: timer.state(),
            },
            current_revealer: round.current_revealer().map(|p| p.id),
            card_visible: card_visible && round.phase() == Phase::Reveal,
            current_turn: round.current_turn_player().map(|p| p.id),
            result,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualificationMarker {
    Qualified,
    Eliminated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based rank; ties keep roster order.
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
    /// Set only when a final could be played next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<QualificationMarker>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardView {
    pub current_round: u32,
    pub total_rounds: u32,
    pub is_final_round: bool,
    pub entries: Vec<LeaderboardEntry>,
    pub can_play_final: bool,
    pub is_tournament_over: bool,
}
