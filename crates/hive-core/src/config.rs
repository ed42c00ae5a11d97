//! Game configuration.

use crate::player::Inventory;
use serde::{Deserialize, Serialize};

/// Total turns (both teams) before the game is declared a draw
pub const DEFAULT_TURN_LIMIT: u32 = 200;

/// A team's turn number by which its Queen Bee must be on the board
pub const DEFAULT_QUEEN_DEADLINE: u32 = 4;

/// Rules that can vary between games
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Draw once this many turns have been played without a winner
    pub turn_limit: u32,
    /// Pieces each team starts with
    pub inventory: Inventory,
    /// A team's turn number by which the Queen Bee must be placed
    pub queen_deadline_turn: u32,
    /// Forbid moving pieces until the team's Queen Bee is on the board
    pub require_queen_before_moving: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_limit: DEFAULT_TURN_LIMIT,
            inventory: Inventory::standard(),
            queen_deadline_turn: DEFAULT_QUEEN_DEADLINE,
            require_queen_before_moving: false,
        }
    }
}

impl GameConfig {
    /// Default rules with a different turn limit
    pub fn with_turn_limit(turn_limit: u32) -> Self {
        Self {
            turn_limit,
            ..Self::default()
        }
    }
}
