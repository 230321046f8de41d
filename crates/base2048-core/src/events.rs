//! Events produced by a move.
//!
//! A move that changes the board reports what happened as a list of events,
//! in the order they occurred. UI layers use them for animation and sound; an
//! empty list means the move was rejected or changed nothing.

use crate::coord::{Direction, Position};
use serde::{Deserialize, Serialize};

/// Something that happened during a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A tile slid without merging
    TileMoved { from: Position, to: Position, value: u32 },

    /// Two equal tiles combined into one at `into`
    TilesMerged {
        /// Pre-move positions of the two source tiles (moving tile first)
        from: [Position; 2],
        into: Position,
        /// Value of the new tile, also the score gained
        value: u32,
    },

    /// A new tile appeared after the move
    TileSpawned { position: Position, value: u32 },

    /// A merge reached the winning value
    GameWon { value: u32 },

    /// No empty cells and no adjacent equal tiles remain
    GameOver { final_score: u64 },
}

/// Summary of one accepted move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub direction: Direction,
    pub score_gained: u64,
    pub events: Vec<GameEvent>,
}

impl MoveRecord {
    /// Build the summary for `direction` from its events
    pub fn new(direction: Direction, events: Vec<GameEvent>) -> Self {
        Self {
            direction,
            score_gained: score_gained(&events),
            events,
        }
    }

    /// Whether the move changed the board
    pub fn moved(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Score added by the merges among `events`
pub fn score_gained(events: &[GameEvent]) -> u64 {
    events
        .iter()
        .map(|e| match e {
            GameEvent::TilesMerged { value, .. } => u64::from(*value),
            _ => 0,
        })
        .sum()
}

/// The tile spawned by a move, if any
pub fn spawned_tile(events: &[GameEvent]) -> Option<(Position, u32)> {
    events.iter().find_map(|e| match e {
        GameEvent::TileSpawned { position, value } => Some((*position, *value)),
        _ => None,
    })
}
