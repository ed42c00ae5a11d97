//! Core game state machine.
//!
//! This module contains the main `GameState` struct: turn order, both
//! reserves, the board, legal action enumeration, and turn application.

use crate::actions::{GameEvent, LegalActions, Turn, TurnAction};
use crate::board::{Board, PieceId, PieceKind, Team};
use crate::config::GameConfig;
use crate::hex::HexCoord;
use crate::hive::{can_remove_without_disconnecting, pinned_cells};
use crate::movement;
use crate::placement;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Why a game ended without a winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReason {
    /// Both Queen Bees were surrounded by the same turn
    BothQueensSurrounded,
    /// The turn limit was reached
    TurnLimit,
}

/// Why a game ended with a winner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// The loser's Queen Bee has all six neighbors occupied
    QueenSurrounded,
    /// The loser reached its Queen deadline with nowhere to place her
    QueenUnplaceable,
}

/// Where the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Winner(Team),
    Draw(DrawReason),
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

impl std::fmt::Display for GameStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Winner(team) => write!(f, "{} wins", team),
            GameStatus::Draw(DrawReason::BothQueensSurrounded) => {
                write!(f, "draw (both queens surrounded)")
            }
            GameStatus::Draw(DrawReason::TurnLimit) => write!(f, "draw (turn limit)"),
        }
    }
}

/// Reasons a turn is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalTurn {
    #[error("Not your turn")]
    NotPlayersTurn,

    #[error("Target cell is occupied")]
    TargetOccupiedOrUnoccupiedMismatch,

    #[error("Placement must touch one of your pieces")]
    NotAdjacentToOwnPiece,

    #[error("Placement must not touch an opponent piece")]
    AdjacentToOpponent,

    #[error("Queen Bee must be placed by this turn")]
    QueenDeadlineViolation,

    #[error("No pieces of that kind left in reserve")]
    PieceExhausted,

    #[error("Moving that piece would split the hive")]
    WouldDisconnectHive,

    #[error("The piece cannot reach that cell")]
    NoValidSlidePath,

    #[error("Piece kind does not match the piece being moved")]
    WrongPieceTypeForMover,

    #[error("The first piece must be placed at the origin")]
    MustPlaceAtOrigin,

    #[error("Placement must touch the hive")]
    NotAdjacentToHive,

    #[error("Piece is not on the board")]
    PieceNotOnBoard,

    #[error("Piece belongs to the other team")]
    NotYourPiece,

    #[error("Piece is covered by another piece")]
    PieceCovered,

    #[error("Queen Bee must be placed before moving")]
    QueenNotPlaced,

    #[error("Cannot pass while a legal action exists")]
    PassNotAllowed,
}

/// Errors that can occur when applying turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Illegal turn: {0}")]
    IllegalTurn(#[from] IllegalTurn),

    #[error("Game is over")]
    GameOver,
}

/// A recorded turn that failed to apply during replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Turn {index} could not be replayed: {error}")]
pub struct ReplayError {
    /// Zero-based position in the turn log
    pub index: usize,
    pub error: GameError,
}

/// A turn that passed validation, resolved to concrete cells
enum ValidatedAction {
    Place { kind: PieceKind, to: HexCoord },
    Move { from: HexCoord, to: HexCoord },
    Pass,
}

/// The complete game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    /// Indexed by `Team::index`
    players: [Player; 2],
    current_team: Team,
    /// Turns played by both teams
    turn_number: u32,
    status: GameStatus,
    history: Vec<Turn>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameState {
    /// Create a new game: empty board, full reserves, white to move
    pub fn new(config: GameConfig) -> Self {
        let first_black_id = config.inventory.team_size();
        let white = config.inventory.pieces_for(Team::White, 0);
        let black = config.inventory.pieces_for(Team::Black, first_black_id);

        Self {
            config,
            board: Board::new(),
            players: [Player::new(Team::White, white), Player::new(Team::Black, black)],
            current_team: Team::White,
            turn_number: 0,
            status: GameStatus::InProgress,
            history: Vec::new(),
        }
    }

    /// Rebuild a game by applying a recorded turn log from the start
    pub fn replay(config: GameConfig, turns: &[Turn]) -> Result<Self, ReplayError> {
        let mut game = Self::new(config);
        for (index, turn) in turns.iter().enumerate() {
            game.apply_turn(*turn)
                .map_err(|error| ReplayError { index, error })?;
        }
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, team: Team) -> &Player {
        &self.players[team.index()]
    }

    fn player_mut(&mut self, team: Team) -> &mut Player {
        &mut self.players[team.index()]
    }

    pub fn current_team(&self) -> Team {
        self.current_team
    }

    /// Turns played so far by both teams
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Turns completed by one team
    pub fn turns_taken(&self, team: Team) -> u32 {
        self.player(team).turns_taken
    }

    pub fn reserve_count(&self, team: Team, kind: PieceKind) -> usize {
        self.player(team).reserve_count(kind)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Get the winner if the game is finished with one
    pub fn winner(&self) -> Option<Team> {
        match self.status {
            GameStatus::Winner(team) => Some(team),
            _ => None,
        }
    }

    /// Every turn applied so far, in order
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    fn is_turn_of(&self, team: Team) -> bool {
        !self.is_finished() && self.current_team == team
    }

    /// Checks shared by every move a team makes, independent of the piece
    fn move_permitted(&self, team: Team) -> Result<(), IllegalTurn> {
        if placement::queen_due(self.player(team), self.config.queen_deadline_turn) {
            return Err(IllegalTurn::QueenDeadlineViolation);
        }
        if self.config.require_queen_before_moving && self.board.queen_of(team).is_none() {
            return Err(IllegalTurn::QueenNotPlaced);
        }
        Ok(())
    }

    // ==================== Legal Action Queries ====================

    /// Which kinds of action a team could take right now
    pub fn legal_actions_for(&self, team: Team) -> LegalActions {
        LegalActions {
            can_place: !self.placeable_kinds(team).is_empty(),
            can_move: !self.movable_pieces(team).is_empty(),
        }
    }

    /// Piece kinds the team could place this turn
    pub fn placeable_kinds(&self, team: Team) -> BTreeSet<PieceKind> {
        if !self.is_turn_of(team) {
            return BTreeSet::new();
        }
        let player = self.player(team);
        let kinds = if placement::queen_due(player, self.config.queen_deadline_turn) {
            BTreeSet::from([PieceKind::QueenBee])
        } else {
            player.kinds_in_reserve()
        };

        if kinds.is_empty()
            || placement::placement_targets(&self.board, team, player.is_first_turn()).is_empty()
        {
            return BTreeSet::new();
        }
        kinds
    }

    /// Cells where the team could place a piece of `kind` this turn
    pub fn placement_targets(&self, team: Team, kind: PieceKind) -> BTreeSet<HexCoord> {
        if !self.placeable_kinds(team).contains(&kind) {
            return BTreeSet::new();
        }
        let player = self.player(team);
        placement::placement_targets(&self.board, team, player.is_first_turn())
    }

    /// Pieces of the team that have at least one legal move this turn
    pub fn movable_pieces(&self, team: Team) -> BTreeSet<PieceId> {
        if !self.is_turn_of(team) || self.move_permitted(team).is_err() {
            return BTreeSet::new();
        }

        let pinned = pinned_cells(&self.board);
        let movable: BTreeSet<PieceId> = self
            .board
            .controlled_by(team)
            .filter(|cell| !pinned.contains(cell))
            .filter(|cell| self.board.top_at(cell).is_some_and(|p| p.kind.can_move()))
            .filter(|cell| !movement::destinations_unchecked(&self.board, cell).is_empty())
            .filter_map(|cell| self.board.top_at(&cell).map(|p| p.id))
            .collect();

        trace!(%team, count = movable.len(), "movable pieces");
        movable
    }

    /// Cells the given piece could move to this turn
    pub fn move_targets(&self, piece_id: PieceId) -> BTreeSet<HexCoord> {
        let Some(from) = self.movable_origin(piece_id) else {
            return BTreeSet::new();
        };
        movement::destinations(&self.board, &from)
    }

    /// The cell of a piece that is allowed to try moving: on top of its stack
    /// and owned by the team to move
    fn movable_origin(&self, piece_id: PieceId) -> Option<HexCoord> {
        let (from, _) = self.board.locate(piece_id)?;
        let top = self.board.top_at(&from)?;
        if top.id != piece_id || !self.is_turn_of(top.team) {
            return None;
        }
        self.move_permitted(top.team).ok()?;
        Some(from)
    }

    /// Every legal turn for a team, for external decision makers.
    ///
    /// A team to move with nothing to do gets a single `Pass`. Any other team
    /// gets nothing.
    pub fn legal_turns(&self, team: Team) -> Vec<Turn> {
        let mut turns = Vec::new();
        if !self.is_turn_of(team) {
            return turns;
        }

        for kind in self.placeable_kinds(team) {
            for to in self.placement_targets(team, kind) {
                turns.push(Turn::place(team, kind, to));
            }
        }

        for piece_id in self.movable_pieces(team) {
            let Some(kind) = self
                .board
                .locate(piece_id)
                .and_then(|(cell, _)| self.board.top_at(&cell))
                .map(|p| p.kind)
            else {
                continue;
            };
            for to in self.move_targets(piece_id) {
                turns.push(Turn::move_piece(team, piece_id, kind, to));
            }
        }

        if turns.is_empty() {
            turns.push(Turn::pass(team));
        }
        turns
    }

    // ==================== Turn Application ====================

    /// Apply a turn to the game state.
    ///
    /// The turn is checked against the current board before anything
    /// changes; a rejected turn leaves the state untouched.
    pub fn apply_turn(&mut self, turn: Turn) -> Result<Vec<GameEvent>, GameError> {
        if self.is_finished() {
            return Err(GameError::GameOver);
        }

        let action = match self.validate_turn(&turn) {
            Ok(action) => action,
            Err(reason) => {
                trace!(?turn, %reason, "rejected turn");
                return Err(GameError::IllegalTurn(reason));
            }
        };

        let team = turn.team;
        let mut events = Vec::new();

        match action {
            ValidatedAction::Place { kind, to } => {
                let piece = self
                    .player_mut(team)
                    .take_from_reserve(kind)
                    .ok_or(IllegalTurn::PieceExhausted)?;
                self.board.place(piece, to);
                events.push(GameEvent::PiecePlaced {
                    team,
                    piece: piece.id,
                    kind,
                    at: to,
                });
            }
            ValidatedAction::Move { from, to } => {
                let piece = self
                    .board
                    .relocate(&from, to)
                    .ok_or(IllegalTurn::PieceNotOnBoard)?;
                events.push(GameEvent::PieceMoved {
                    team,
                    piece: piece.id,
                    kind: piece.kind,
                    from,
                    to,
                    height: self.board.height_at(&to).saturating_sub(1),
                });
            }
            ValidatedAction::Pass => {
                events.push(GameEvent::TurnPassed { team });
            }
        }

        self.player_mut(team).turns_taken += 1;
        self.turn_number += 1;
        self.history.push(turn);
        self.current_team = team.opponent();

        debug!(
            turn = self.turn_number,
            %team,
            action = ?turn.action,
            "applied turn"
        );

        events.push(GameEvent::TurnEnded {
            team,
            next_team: self.current_team,
        });
        events.extend(self.check_end_conditions());

        Ok(events)
    }

    fn validate_turn(&self, turn: &Turn) -> Result<ValidatedAction, IllegalTurn> {
        if turn.team != self.current_team {
            return Err(IllegalTurn::NotPlayersTurn);
        }

        match turn.action {
            TurnAction::Place { kind, to } => {
                placement::validate(
                    &self.board,
                    self.player(turn.team),
                    kind,
                    &to,
                    self.config.queen_deadline_turn,
                )?;
                Ok(ValidatedAction::Place { kind, to })
            }
            TurnAction::Move { piece, kind, to } => {
                let from = self.validate_move(turn.team, piece, kind, &to)?;
                Ok(ValidatedAction::Move { from, to })
            }
            TurnAction::Pass => {
                if !self.legal_actions_for(turn.team).must_pass() {
                    return Err(IllegalTurn::PassNotAllowed);
                }
                Ok(ValidatedAction::Pass)
            }
        }
    }

    /// Check a move and return the cell it starts from
    fn validate_move(
        &self,
        team: Team,
        piece_id: PieceId,
        kind: PieceKind,
        to: &HexCoord,
    ) -> Result<HexCoord, IllegalTurn> {
        let (from, height) = self
            .board
            .locate(piece_id)
            .ok_or(IllegalTurn::PieceNotOnBoard)?;
        let piece = self.board.stack_at(&from)[height];

        if piece.team != team {
            return Err(IllegalTurn::NotYourPiece);
        }
        self.move_permitted(team)?;
        if piece.kind != kind {
            return Err(IllegalTurn::WrongPieceTypeForMover);
        }
        if height + 1 != self.board.height_at(&from) {
            return Err(IllegalTurn::PieceCovered);
        }
        if !can_remove_without_disconnecting(&self.board, &from) {
            return Err(IllegalTurn::WouldDisconnectHive);
        }
        if !movement::destinations_unchecked(&self.board, &from).contains(to) {
            return Err(IllegalTurn::NoValidSlidePath);
        }
        Ok(from)
    }

    // ==================== End Conditions ====================

    fn queen_surrounded(&self, team: Team) -> bool {
        self.board
            .queen_of(team)
            .is_some_and(|cell| self.board.is_surrounded(&cell))
    }

    /// The team to move is past its Queen deadline with nowhere to put her
    fn queen_placement_loser(&self) -> Option<Team> {
        let team = self.current_team;
        let player = self.player(team);
        let stuck = placement::queen_due(player, self.config.queen_deadline_turn)
            && placement::placement_targets(&self.board, team, player.is_first_turn()).is_empty();
        stuck.then_some(team)
    }

    fn check_end_conditions(&mut self) -> Vec<GameEvent> {
        let white_surrounded = self.queen_surrounded(Team::White);
        let black_surrounded = self.queen_surrounded(Team::Black);

        let won = |winner: Team, reason: WinReason| {
            (GameStatus::Winner(winner), GameEvent::GameWon { winner, reason })
        };
        let drawn = |reason: DrawReason| (GameStatus::Draw(reason), GameEvent::GameDrawn { reason });

        let outcome = match (white_surrounded, black_surrounded) {
            (true, true) => Some(drawn(DrawReason::BothQueensSurrounded)),
            (true, false) => Some(won(Team::Black, WinReason::QueenSurrounded)),
            (false, true) => Some(won(Team::White, WinReason::QueenSurrounded)),
            (false, false) if self.turn_number >= self.config.turn_limit => {
                Some(drawn(DrawReason::TurnLimit))
            }
            (false, false) => self
                .queen_placement_loser()
                .map(|loser| won(loser.opponent(), WinReason::QueenUnplaceable)),
        };

        let Some((status, event)) = outcome else {
            return Vec::new();
        };
        self.status = status;
        info!(turn = self.turn_number, %status, ?event, "game over");

        vec![event]
    }
}
