//! Per-team state: the piece inventory and turn bookkeeping.
//!
//! This module contains:
//! - `Inventory`, the number of pieces of each kind a team starts with
//! - `Player`, a team's unplaced pieces and how many turns it has taken

use crate::board::{Piece, PieceId, PieceKind, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Piece counts per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub ant: u8,
    pub beetle: u8,
    pub spider: u8,
    pub grasshopper: u8,
    pub queen_bee: u8,
    pub ladybug: u8,
    pub mosquito: u8,
}

impl Inventory {
    /// An inventory with no pieces
    pub fn empty() -> Self {
        Self {
            ant: 0,
            beetle: 0,
            spider: 0,
            grasshopper: 0,
            queen_bee: 0,
            ladybug: 0,
            mosquito: 0,
        }
    }

    /// The base set: 6 Ants, 2 Beetles, 2 Spiders, 2 Grasshoppers, 1 Queen Bee
    pub fn standard() -> Self {
        Self {
            ant: 6,
            beetle: 2,
            spider: 2,
            grasshopper: 2,
            queen_bee: 1,
            ladybug: 0,
            mosquito: 0,
        }
    }

    /// Get count of a specific kind
    pub fn get(&self, kind: PieceKind) -> u8 {
        match kind {
            PieceKind::Ant => self.ant,
            PieceKind::Beetle => self.beetle,
            PieceKind::Spider => self.spider,
            PieceKind::Grasshopper => self.grasshopper,
            PieceKind::QueenBee => self.queen_bee,
            PieceKind::Ladybug => self.ladybug,
            PieceKind::Mosquito => self.mosquito,
        }
    }

    /// Set count of a specific kind
    pub fn set(&mut self, kind: PieceKind, count: u8) {
        match kind {
            PieceKind::Ant => self.ant = count,
            PieceKind::Beetle => self.beetle = count,
            PieceKind::Spider => self.spider = count,
            PieceKind::Grasshopper => self.grasshopper = count,
            PieceKind::QueenBee => self.queen_bee = count,
            PieceKind::Ladybug => self.ladybug = count,
            PieceKind::Mosquito => self.mosquito = count,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, kind: PieceKind, count: u8) -> Self {
        self.set(kind, count);
        self
    }

    /// Total number of pieces
    pub fn total(&self) -> u32 {
        PieceKind::ALL.iter().map(|k| self.get(*k) as u32).sum()
    }

    /// Number of pieces one team owns, as an id offset
    pub fn team_size(&self) -> PieceId {
        PieceKind::ALL
            .iter()
            .map(|k| PieceId::from(self.get(*k)))
            .sum()
    }

    /// Materialize pieces for one team, numbering ids from `first_id`
    pub fn pieces_for(&self, team: Team, first_id: PieceId) -> Vec<Piece> {
        let mut pieces = Vec::with_capacity(self.total() as usize);
        let mut id = first_id;
        for kind in PieceKind::ALL {
            for _ in 0..self.get(kind) {
                pieces.push(Piece::new(id, team, kind));
                id += 1;
            }
        }
        pieces
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::standard()
    }
}

/// A team's off-board state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub team: Team,
    /// Completed turns, including passes
    pub turns_taken: u32,
    /// Pieces not yet placed, lowest id first
    pub reserve: Vec<Piece>,
}

impl Player {
    pub fn new(team: Team, reserve: Vec<Piece>) -> Self {
        Self {
            team,
            turns_taken: 0,
            reserve,
        }
    }

    /// The number of the turn this team is about to play (1 on its first turn)
    pub fn turn_number(&self) -> u32 {
        self.turns_taken + 1
    }

    pub fn is_first_turn(&self) -> bool {
        self.turns_taken == 0
    }

    /// How many pieces of a kind are still in reserve
    pub fn reserve_count(&self, kind: PieceKind) -> usize {
        self.reserve.iter().filter(|p| p.kind == kind).count()
    }

    pub fn has_in_reserve(&self, kind: PieceKind) -> bool {
        self.reserve.iter().any(|p| p.kind == kind)
    }

    /// Kinds with at least one piece in reserve
    pub fn kinds_in_reserve(&self) -> BTreeSet<PieceKind> {
        self.reserve.iter().map(|p| p.kind).collect()
    }

    /// Remove and return the lowest-id reserve piece of a kind
    pub fn take_from_reserve(&mut self, kind: PieceKind) -> Option<Piece> {
        let index = self.reserve.iter().position(|p| p.kind == kind)?;
        Some(self.reserve.remove(index))
    }
}
