//! Serialized game state.
//!
//! These types are the storage contract: saved games and undo snapshots are
//! written in this shape and must keep loading across releases.
//!
//! ```json
//! {
//!   "grid": { "size": 4, "cells": [{ "position": { "row": 0, "col": 0 }, "value": 2 }, null, ...] },
//!   "score": 0, "over": false, "won": false, "keepPlaying": false
//! }
//! ```

use crate::coord::Position;
use serde::{Deserialize, Serialize};

/// A serialized tile: position and value only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileJson {
    pub position: Position,
    pub value: u32,
}

/// A serialized grid with cells in row-major order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridJson {
    pub size: usize,
    pub cells: Vec<Option<TileJson>>,
}

/// Complete engine state as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateJson {
    pub grid: GridJson,
    pub score: u64,
    pub over: bool,
    pub won: bool,
    pub keep_playing: bool,
}

impl GameStateJson {
    /// Encode as a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
