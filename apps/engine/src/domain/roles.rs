//! Hidden role assignment and turn order.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::shuffle::random_permutation;
use crate::domain::state::Winner;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Knows the secret word.
    Civilian,
    /// Does not know the word and must blend in.
    Impostor,
    /// Does not know the word; if caught, gets one guess to steal the win.
    MrWolf,
}

impl Role {
    pub const fn is_enemy(self) -> bool {
        !matches!(self, Role::Civilian)
    }

    pub const fn knows_word(self) -> bool {
        matches!(self, Role::Civilian)
    }
}

/// Which enemies take part in a round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnemyConfig {
    #[default]
    ImpostorOnly,
    WolfOnly,
    /// One impostor and one Mr. Wolf; needs `BOTH_MIN_PLAYERS`.
    Both,
}

impl EnemyConfig {
    pub const BOTH_MIN_PLAYERS: usize = 5;

    /// Enemy roles dealt to the head of the role permutation.
    pub const fn enemy_roles(self) -> &'static [Role] {
        match self {
            EnemyConfig::ImpostorOnly => &[Role::Impostor],
            EnemyConfig::WolfOnly => &[Role::MrWolf],
            EnemyConfig::Both => &[Role::Impostor, Role::MrWolf],
        }
    }

    /// The config a round with `player_count` players actually plays.
    ///
    /// `Both` silently degrades to `ImpostorOnly` below `BOTH_MIN_PLAYERS`.
    /// Every round plan goes through here before a round starts.
    pub const fn effective_for(self, player_count: usize) -> Self {
        match self {
            EnemyConfig::Both if player_count < Self::BOTH_MIN_PLAYERS => {
                EnemyConfig::ImpostorOnly
            }
            other => other,
        }
    }

    /// Winner when the group votes out a civilian.
    pub const fn civilian_accused_winner(self) -> Winner {
        match self {
            EnemyConfig::ImpostorOnly => Winner::Impostor,
            EnemyConfig::WolfOnly => Winner::MrWolf,
            EnemyConfig::Both => Winner::Enemies,
        }
    }
}

/// Roles indexed by roster position, plus an independent turn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    roles: Vec<Role>,
    turn_order: Vec<usize>,
}

impl RoleAssignment {
    /// `roles()[i]` is the role of roster entry `i`.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Roster indices in play order (also the reveal order).
    pub fn turn_order(&self) -> &[usize] {
        &self.turn_order
    }

    /// Roster indices holding `role`.
    pub fn holders_of(&self, role: Role) -> Vec<usize> {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, r)| **r == role)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Deal roles for `player_count` players.
///
/// Two independent permutations are drawn: the first decides who holds the
/// enemy roles (its head entries), the second is the turn order. The caller
/// guarantees `player_count >= 3` and applies `EnemyConfig::effective_for`
/// beforehand.
pub fn assign_roles<R: Rng + ?Sized>(
    player_count: usize,
    config: EnemyConfig,
    rng: &mut R,
) -> RoleAssignment {
    debug_assert!(player_count >= 3, "at least 3 players required");
    debug_assert_eq!(
        config,
        config.effective_for(player_count),
        "enemy config must be resolved before assignment"
    );

    let role_perm = random_permutation(player_count, rng);
    let mut roles = vec![Role::Civilian; player_count];
    for (&idx, &role) in role_perm.iter().zip(config.enemy_roles()) {
        roles[idx] = role;
    }

    let turn_order = random_permutation(player_count, rng);

    RoleAssignment { roles, turn_order }
}
