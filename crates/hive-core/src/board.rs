//! Board representation: teams, pieces, and stacks of pieces on hex cells.
//!
//! This module contains:
//! - Team and piece kind enums
//! - The `Piece` identity that lives for the whole game
//! - The `Board`, a sparse map from cell to the stack of pieces on it
//!
//! The board only knows how to push and pop pieces. Whether a push or pop is
//! legal is decided by the placement and movement rules.

use crate::hex::HexCoord;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Piece identifier, unique within a game.
///
/// Wide enough for two full inventories at the maximum count of every kind.
pub type PieceId = u16;

/// The two sides of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    White,
    Black,
}

impl Team {
    /// Both teams in turn order
    pub const ALL: [Team; 2] = [Team::White, Team::Black];

    pub fn opponent(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// Stable index for per-team arrays
    pub fn index(self) -> usize {
        match self {
            Team::White => 0,
            Team::Black => 1,
        }
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Team::White => write!(f, "white"),
            Team::Black => write!(f, "black"),
        }
    }
}

/// Bug types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    /// Slides any distance around the hive
    Ant,
    /// Moves one step, may climb on top of the hive
    Beetle,
    /// Slides exactly three steps
    Spider,
    /// Jumps in a straight line over the hive
    Grasshopper,
    /// Moves one step; surrounding it wins the game
    QueenBee,
    /// Reserved, never moves
    Ladybug,
    /// Reserved, never moves
    Mosquito,
}

impl PieceKind {
    /// All piece kinds
    pub const ALL: [PieceKind; 7] = [
        PieceKind::Ant,
        PieceKind::Beetle,
        PieceKind::Spider,
        PieceKind::Grasshopper,
        PieceKind::QueenBee,
        PieceKind::Ladybug,
        PieceKind::Mosquito,
    ];

    /// Whether this kind has a movement pattern
    pub fn can_move(&self) -> bool {
        !matches!(self, PieceKind::Ladybug | PieceKind::Mosquito)
    }

    /// Single-letter notation
    pub fn letter(&self) -> char {
        match self {
            PieceKind::Ant => 'A',
            PieceKind::Beetle => 'B',
            PieceKind::Spider => 'S',
            PieceKind::Grasshopper => 'G',
            PieceKind::QueenBee => 'Q',
            PieceKind::Ladybug => 'L',
            PieceKind::Mosquito => 'M',
        }
    }
}

/// A single physical piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub team: Team,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(id: PieceId, team: Team, kind: PieceKind) -> Self {
        Self { id, team, kind }
    }
}

/// Short notation: team initial, kind letter, id (`wQ12`)
impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let team = match self.team {
            Team::White => 'w',
            Team::Black => 'b',
        };
        write!(f, "{}{}{}", team, self.kind.letter(), self.id)
    }
}

/// The hive: every occupied cell and the stack of pieces on it (bottom to top).
///
/// Empty cells are never stored, so every stack in the map is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BoardJson", into = "BoardJson")]
pub struct Board {
    stacks: HashMap<HexCoord, Vec<Piece>>,
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Pieces at a cell, bottom first (empty slice if unoccupied)
    pub fn stack_at(&self, coord: &HexCoord) -> &[Piece] {
        self.stacks.get(coord).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The piece on top of a cell, if any
    pub fn top_at(&self, coord: &HexCoord) -> Option<&Piece> {
        self.stacks.get(coord).and_then(|stack| stack.last())
    }

    pub fn is_occupied(&self, coord: &HexCoord) -> bool {
        self.stacks.contains_key(coord)
    }

    /// Number of pieces stacked on a cell
    pub fn height_at(&self, coord: &HexCoord) -> usize {
        self.stack_at(coord).len()
    }

    /// All occupied cells
    pub fn occupied(&self) -> impl Iterator<Item = &HexCoord> {
        self.stacks.keys()
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Total pieces on the board, counting stacked ones
    pub fn piece_count(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    /// Occupied cells adjacent to `coord`
    pub fn occupied_neighbors(&self, coord: &HexCoord) -> impl Iterator<Item = HexCoord> + '_ {
        coord
            .neighbors()
            .into_iter()
            .filter(move |n| self.is_occupied(n))
    }

    /// Whether any neighbor of `coord` is occupied
    pub fn touches_hive(&self, coord: &HexCoord) -> bool {
        self.occupied_neighbors(coord).next().is_some()
    }

    /// Whether all six neighbors of `coord` are occupied
    pub fn is_surrounded(&self, coord: &HexCoord) -> bool {
        self.occupied_neighbors(coord).count() == 6
    }

    /// Find a piece on the board: its cell and zero-based height in the stack
    pub fn locate(&self, id: PieceId) -> Option<(HexCoord, usize)> {
        self.stacks.iter().find_map(|(coord, stack)| {
            stack
                .iter()
                .position(|p| p.id == id)
                .map(|height| (*coord, height))
        })
    }

    /// Cell of a team's Queen Bee, if it has been placed
    pub fn queen_of(&self, team: Team) -> Option<HexCoord> {
        self.stacks.iter().find_map(|(coord, stack)| {
            stack
                .iter()
                .any(|p| p.team == team && p.kind == PieceKind::QueenBee)
                .then_some(*coord)
        })
    }

    /// Cells whose top piece belongs to `team`
    pub fn controlled_by(&self, team: Team) -> impl Iterator<Item = HexCoord> + '_ {
        self.stacks
            .iter()
            .filter(move |(_, stack)| stack.last().map(|p| p.team) == Some(team))
            .map(|(coord, _)| *coord)
    }

    /// Push a piece on top of a cell
    pub fn place(&mut self, piece: Piece, coord: HexCoord) {
        self.stacks.entry(coord).or_default().push(piece);
    }

    /// Pop the top piece from a cell, dropping the cell when it empties
    pub fn remove(&mut self, coord: &HexCoord) -> Option<Piece> {
        let stack = self.stacks.get_mut(coord)?;
        let piece = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(coord);
        }
        piece
    }

    /// Move the top piece of `from` onto `to`
    pub fn relocate(&mut self, from: &HexCoord, to: HexCoord) -> Option<Piece> {
        let piece = self.remove(from)?;
        self.place(piece, to);
        Some(piece)
    }

    /// A copy of the board with the top piece at `coord` lifted off.
    ///
    /// Legality checks run against this snapshot so the live board is never
    /// left half-mutated.
    pub fn lifted(&self, coord: &HexCoord) -> (Board, Option<Piece>) {
        let mut snapshot = self.clone();
        let piece = snapshot.remove(coord);
        (snapshot, piece)
    }

    /// Convert to a JSON-friendly representation with a list instead of a map.
    /// JSON object keys must be strings, so coordinates cannot be map keys.
    pub fn to_json_friendly(&self) -> BoardJson {
        let mut stacks: Vec<StackJson> = self
            .stacks
            .iter()
            .map(|(coord, pieces)| StackJson {
                coord: *coord,
                pieces: pieces.clone(),
            })
            .collect();
        stacks.sort_by_key(|s| s.coord);
        BoardJson { stacks }
    }
}

/// JSON-friendly board representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardJson {
    pub stacks: Vec<StackJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackJson {
    pub coord: HexCoord,
    /// Bottom first
    pub pieces: Vec<Piece>,
}

impl From<Board> for BoardJson {
    fn from(board: Board) -> Self {
        board.to_json_friendly()
    }
}

impl From<BoardJson> for Board {
    fn from(json: BoardJson) -> Self {
        let mut board = Board::new();
        for stack in json.stacks {
            for piece in stack.pieces {
                board.place(piece, stack.coord);
            }
        }
        board
    }
}
