use serde::{Deserialize, Serialize};

use crate::domain::roles::Role;

/// Opaque per-session player identifier: the player's join order in the
/// lobby roster. Stable across rounds even though turn order is reshuffled.
pub type PlayerId = u32;

/// Round lifecycle phases, in strict forward order.
///
/// `WolfGuess` is only entered when Mr. Wolf is the accused player.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Roles are shown one player at a time, in turn order.
    Reveal,
    /// Discussion with the countdown running.
    Playing,
    /// The group picks exactly one accused player.
    Voting,
    /// Mr. Wolf was caught and gets one guess at the secret word.
    WolfGuess,
    /// Terminal; outcome is frozen.
    Result,
}

/// Which side took the round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    Players,
    Impostor,
    MrWolf,
    /// Impostor and Mr. Wolf together (only with `EnemyConfig::Both`).
    Enemies,
}

/// How the round was decided.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinMethod {
    Vote,
    Guess,
    /// Reserved for a timeout-decides variant; timer expiry currently opens
    /// the vote instead of ending the round.
    Time,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winner: Winner,
    pub method: WinMethod,
}

impl RoundOutcome {
    pub const fn new(winner: Winner, method: WinMethod) -> Self {
        Self { winner, method }
    }
}

/// A seated player in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub role: Role,
    /// Cumulative tournament score carried into this round.
    pub score: u32,
}

/// A lobby roster entry carried between rounds (no role yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
    pub score: u32,
}

impl RosterEntry {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
        }
    }

    pub fn with_score(mut self, score: u32) -> Self {
        self.score = score;
        self
    }
}

/// Lookup helper shared by the round and the tournament.
pub fn find_player(players: &[Player], id: PlayerId) -> Option<&Player> {
    players.iter().find(|p| p.id == id)
}

/// Players holding `role`, in the order given.
pub fn players_with_role(players: &[Player], role: Role) -> impl Iterator<Item = &Player> {
    players.iter().filter(move |p| p.role == role)
}
