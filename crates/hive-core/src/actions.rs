//! Turns that players submit and the events that result from them.

use crate::board::{PieceId, PieceKind, Team};
use crate::game::{DrawReason, WinReason};
use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};

/// What a player does on their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnAction {
    /// Put a piece of this kind from the reserve onto the board
    Place { kind: PieceKind, to: HexCoord },
    /// Move a piece already on the board
    Move {
        piece: PieceId,
        kind: PieceKind,
        to: HexCoord,
    },
    /// Skip the turn; only legal when nothing else is
    Pass,
}

/// A turn request: who is acting and what they want to do.
///
/// A recorded sequence of turns is the canonical replay log of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    pub team: Team,
    pub action: TurnAction,
}

impl Turn {
    pub fn place(team: Team, kind: PieceKind, to: HexCoord) -> Self {
        Self {
            team,
            action: TurnAction::Place { kind, to },
        }
    }

    pub fn move_piece(team: Team, piece: PieceId, kind: PieceKind, to: HexCoord) -> Self {
        Self {
            team,
            action: TurnAction::Move { piece, kind, to },
        }
    }

    pub fn pass(team: Team) -> Self {
        Self {
            team,
            action: TurnAction::Pass,
        }
    }

    /// Piece kind named by the turn, if any
    pub fn kind(&self) -> Option<PieceKind> {
        match self.action {
            TurnAction::Place { kind, .. } | TurnAction::Move { kind, .. } => Some(kind),
            TurnAction::Pass => None,
        }
    }

    /// Destination cell, if any
    pub fn target(&self) -> Option<HexCoord> {
        match self.action {
            TurnAction::Place { to, .. } | TurnAction::Move { to, .. } => Some(to),
            TurnAction::Pass => None,
        }
    }
}

/// Summary of which kinds of action a team has available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegalActions {
    pub can_place: bool,
    pub can_move: bool,
}

impl LegalActions {
    /// Nothing to do: the team must pass
    pub fn must_pass(&self) -> bool {
        !self.can_place && !self.can_move
    }
}

/// Events that occur as a result of turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A piece left the reserve
    PiecePlaced {
        team: Team,
        piece: PieceId,
        kind: PieceKind,
        at: HexCoord,
    },

    /// A piece moved across the board
    PieceMoved {
        team: Team,
        piece: PieceId,
        kind: PieceKind,
        from: HexCoord,
        to: HexCoord,
        /// Zero-based stack height the piece landed at
        height: usize,
    },

    /// A team had nothing to do
    TurnPassed { team: Team },

    /// Turn ended
    TurnEnded { team: Team, next_team: Team },

    /// A team won the game
    GameWon { winner: Team, reason: WinReason },

    /// The game ended without a winner
    GameDrawn { reason: DrawReason },
}
