//! Turn log format and the replay driver.

use anyhow::{Context, Result};
use hive_core::board::BoardJson;
use hive_core::{GameConfig, GameEvent, GameState, GameStatus, ReplayError, Turn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// A recorded game: the rules it was played under and every turn in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayLog {
    #[serde(default)]
    pub config: GameConfig,
    pub turns: Vec<Turn>,
}

impl ReplayLog {
    /// Read a log from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse turn log {}", path.display()))
    }
}

/// What came out of a replay
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub status: GameStatus,
    pub turns_applied: usize,
    pub board: BoardJson,
    pub events: Vec<GameEvent>,
}

/// Apply every turn of the log to a fresh game, collecting the events
pub fn run(log: &ReplayLog) -> Result<ReplayReport> {
    let mut game = GameState::new(log.config.clone());
    let mut events = Vec::new();

    for (index, turn) in log.turns.iter().enumerate() {
        let produced = game
            .apply_turn(*turn)
            .map_err(|error| ReplayError { index, error })
            .with_context(|| format!("turn {:?} was rejected", turn))?;
        debug!(index, count = produced.len(), "replayed turn");
        events.extend(produced);
    }

    info!(
        turns = log.turns.len(),
        status = %game.status(),
        "replay finished"
    );

    Ok(ReplayReport {
        status: game.status(),
        turns_applied: log.turns.len(),
        board: game.board().to_json_friendly(),
        events,
    })
}
