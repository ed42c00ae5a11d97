//! Hive - a rules engine for the hexagonal tile-laying game
//!
//! This crate provides the core game logic, including:
//! - Cube coordinates for the unbounded hex grid
//! - Board representation with stackable pieces
//! - The one-hive connectivity rule
//! - Movement generators for each piece kind
//! - Game state machine with full rule enforcement
//!
//! # Architecture
//!
//! The engine never asks anyone for a decision. Callers query the legal
//! turns for the team to move, choose one, and hand it back to
//! [`GameState::apply_turn`], which re-validates it against the current
//! board. The applied turns form a replay log.
//!
//! # Modules
//!
//! - [`hex`]: Cube coordinate system and directions
//! - [`board`]: Teams, pieces, and the stacked board
//! - [`hive`]: Connectivity checks
//! - [`movement`]: Per-kind movement generation and freedom of movement
//! - [`placement`]: Rules for entering pieces from the reserve
//! - [`player`]: Inventories and per-team turn bookkeeping
//! - [`actions`]: Turns and game events
//! - [`config`]: Game configuration
//! - [`game`]: Game state machine

pub mod actions;
pub mod board;
pub mod config;
pub mod game;
pub mod hex;
pub mod hive;
pub mod movement;
pub mod placement;
pub mod player;

// Re-export commonly used types
pub use actions::{GameEvent, LegalActions, Turn, TurnAction};
pub use board::{Board, Piece, PieceId, PieceKind, Team};
pub use config::GameConfig;
pub use game::{
    DrawReason, GameError, GameState, GameStatus, IllegalTurn, ReplayError, WinReason,
};
pub use hex::{Direction, HexCoord, HexError, MAX_COMPONENT};
pub use hive::is_connected;
pub use player::{Inventory, Player};
