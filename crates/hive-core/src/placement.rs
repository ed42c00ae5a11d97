//! Placement rules for pieces entering the board from a team's reserve.

use crate::board::{Board, PieceKind, Team};
use crate::game::IllegalTurn;
use crate::hex::HexCoord;
use crate::player::Player;
use std::collections::BTreeSet;

/// Whether the team must place its Queen Bee this turn
pub fn queen_due(player: &Player, deadline_turn: u32) -> bool {
    player.turn_number() >= deadline_turn && player.has_in_reserve(PieceKind::QueenBee)
}

/// Check that `player` may place a piece of `kind` at `to`.
///
/// Turn order is the caller's concern; everything else about a placement is
/// checked here, in this order: queen deadline, reserve, then location.
pub fn validate(
    board: &Board,
    player: &Player,
    kind: PieceKind,
    to: &HexCoord,
    deadline_turn: u32,
) -> Result<(), IllegalTurn> {
    if queen_due(player, deadline_turn) && kind != PieceKind::QueenBee {
        return Err(IllegalTurn::QueenDeadlineViolation);
    }
    if !player.has_in_reserve(kind) {
        return Err(IllegalTurn::PieceExhausted);
    }
    check_location(board, player.team, player.is_first_turn(), to)
}

/// Location rules only: origin on an empty board, otherwise an empty cell
/// touching the hive and, after a team's first turn, only its own pieces.
pub fn check_location(
    board: &Board,
    team: Team,
    first_turn: bool,
    to: &HexCoord,
) -> Result<(), IllegalTurn> {
    if board.is_empty() {
        return if *to == HexCoord::ORIGIN {
            Ok(())
        } else {
            Err(IllegalTurn::MustPlaceAtOrigin)
        };
    }
    if board.is_occupied(to) {
        return Err(IllegalTurn::TargetOccupiedOrUnoccupiedMismatch);
    }

    if first_turn {
        if !board.touches_hive(to) {
            return Err(IllegalTurn::NotAdjacentToHive);
        }
        return Ok(());
    }

    let mut touches_own = false;
    for neighbor in to.neighbors() {
        match board.top_at(&neighbor) {
            Some(piece) if piece.team == team => touches_own = true,
            Some(_) => return Err(IllegalTurn::AdjacentToOpponent),
            None => {}
        }
    }
    if !touches_own {
        return Err(IllegalTurn::NotAdjacentToOwnPiece);
    }
    Ok(())
}

/// Every cell where `team` could legally put a new piece
pub fn placement_targets(board: &Board, team: Team, first_turn: bool) -> BTreeSet<HexCoord> {
    if board.is_empty() {
        return BTreeSet::from([HexCoord::ORIGIN]);
    }

    board
        .occupied()
        .flat_map(|cell| cell.neighbors())
        .filter(|cell| check_location(board, team, first_turn, cell).is_ok())
        .collect()
}
