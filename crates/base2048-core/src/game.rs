//! Core game engine.
//!
//! This module contains `GameManager`, which owns the grid, the score and the
//! terminal flags, and implements the slide-and-merge move.

use crate::coord::{Direction, Position};
use crate::events::GameEvent;
use crate::grid::{Grid, SUPPORTED_SIZES};
use crate::persist::GameStateJson;
use crate::rng::RandomSource;
use crate::tile::Tile;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tiles placed on a fresh board
pub const START_TILES: usize = 2;

/// Merging into this value wins the game
pub const WINNING_VALUE: u32 = 2048;

/// Chance that a spawned tile is a 2 rather than a 4
pub const TWO_PROBABILITY: f64 = 0.9;

/// Errors for calls that break the engine's input contract
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("Invalid direction code {0}")]
    InvalidDirection(u8),

    #[error("Unsupported grid size {0}")]
    UnsupportedSize(usize),

    #[error("Grid size mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("Malformed game state: {0}")]
    MalformedState(String),

    #[error("No available cell")]
    NoAvailableCell,
}

/// Row and column visiting order for one move
#[derive(Debug, Clone, PartialEq, Eq)]
struct Traversals {
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl Traversals {
    /// Start from the edge the tiles move toward, so a processed tile never
    /// blocks one that comes later.
    fn build(size: usize, direction: Direction) -> Self {
        let (dr, dc) = direction.vector();
        let mut rows: Vec<usize> = (0..size).collect();
        let mut cols: Vec<usize> = (0..size).collect();
        if dr == 1 {
            rows.reverse();
        }
        if dc == 1 {
            cols.reverse();
        }
        Self { rows, cols }
    }
}

/// The game engine.
///
/// Single-threaded and synchronous. It keeps no history: take a
/// [`serialize`](GameManager::serialize) snapshot before a move to support undo.
#[derive(Debug, Clone)]
pub struct GameManager<R = StdRng> {
    grid: Grid,
    score: u64,
    over: bool,
    won: bool,
    keep_playing: bool,
    rng: R,
}

impl GameManager<StdRng> {
    /// Create a game of the given size seeded from OS entropy
    pub fn new(size: usize) -> Result<Self, GameError> {
        Self::with_rng(size, StdRng::from_entropy())
    }

    /// Create a game whose spawns are reproducible from `seed`
    pub fn seeded(size: usize, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(size, StdRng::seed_from_u64(seed))
    }
}

impl<R: RandomSource> GameManager<R> {
    /// Create a game drawing its random tiles from `rng`
    pub fn with_rng(size: usize, rng: R) -> Result<Self, GameError> {
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(GameError::UnsupportedSize(size));
        }

        let mut game = Self {
            grid: Grid::new(size),
            score: 0,
            over: false,
            won: false,
            keep_playing: false,
            rng,
        };
        game.add_start_tiles();
        Ok(game)
    }

    /// Create a game from a stored state without placing start tiles
    pub fn from_state(state: &GameStateJson, rng: R) -> Result<Self, GameError> {
        let grid = Grid::from_json(&state.grid)?;
        Ok(Self {
            grid,
            score: state.score,
            over: state.over,
            won: state.won,
            keep_playing: state.keep_playing,
            rng,
        })
    }

    /// Board side length
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Read-only view of the board
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn keep_playing(&self) -> bool {
        self.keep_playing
    }

    /// Give back the random source, ending this game
    pub fn into_rng(self) -> R {
        self.rng
    }

    pub(crate) fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Start over on an empty board with fresh start tiles
    pub fn restart(&mut self) {
        self.grid = Grid::new(self.grid.size());
        self.score = 0;
        self.over = false;
        self.won = false;
        self.keep_playing = false;
        self.add_start_tiles();
    }

    /// Keep accepting moves after reaching the winning tile
    pub fn continue_after_win(&mut self) {
        self.keep_playing = true;
    }

    /// Whether moves are currently ignored
    pub fn is_terminated(&self) -> bool {
        self.over || (self.won && !self.keep_playing)
    }

    fn add_start_tiles(&mut self) {
        for _ in 0..START_TILES {
            self.add_random_tile();
        }
    }

    /// Spawn a 2 or 4 on a random empty cell. Does nothing on a full board.
    fn add_random_tile(&mut self) -> Option<Tile> {
        if !self.grid.cells_available() {
            return None;
        }

        let value = if self.rng.next_unit() < TWO_PROBABILITY { 2 } else { 4 };
        let position = self.grid.random_available_cell(&mut self.rng).ok()?;
        let tile = Tile::new(position, value);
        self.grid.insert_tile(tile);
        Some(tile)
    }

    /// Forget merge provenance and remember where every tile started
    fn prepare_tiles(&mut self) {
        for tile in self.grid.tiles_mut() {
            tile.prepare_for_move();
        }
    }

    /// Walk from `cell` along `direction` over empty cells.
    ///
    /// Returns the last empty cell reached (or `cell` itself) and the first
    /// occupied cell after it, `None` when the walk hits the edge.
    fn find_farthest_position(
        &self,
        cell: Position,
        direction: Direction,
    ) -> (Position, Option<Position>) {
        let mut farthest = cell;
        loop {
            match farthest.step(direction) {
                Some(next) if self.grid.cell_available(next) => farthest = next,
                Some(next) if self.grid.within_bounds(next) => return (farthest, Some(next)),
                _ => return (farthest, None),
            }
        }
    }

    /// Whether any move could still change the board
    pub fn moves_available(&self) -> bool {
        self.grid.cells_available() || self.grid.tile_matches_available()
    }

    /// Whether moving in `direction` would change the board right now
    pub fn can_move(&self, direction: Direction) -> bool {
        if self.is_terminated() {
            return false;
        }
        self.grid.tiles().any(|tile| {
            tile.position
                .step(direction)
                .filter(|&next| self.grid.within_bounds(next))
                .map(|next| match self.grid.cell_content(next) {
                    None => true,
                    Some(other) => tile.can_merge_with(other),
                })
                .unwrap_or(false)
        })
    }

    /// Directions that would change the board
    pub fn available_moves(&self) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|&dir| self.can_move(dir))
            .collect()
    }

    /// Slide all tiles in `direction`, merging equal pairs.
    ///
    /// Returns the events in order. An empty list means nothing moved: the
    /// game was terminated or no tile could go that way, and in both cases
    /// no tile was spawned.
    pub fn apply_move(&mut self, direction: Direction) -> Vec<GameEvent> {
        let mut events = Vec::new();

        if self.is_terminated() {
            return events;
        }

        let traversals = Traversals::build(self.grid.size(), direction);
        let mut moved = false;

        self.prepare_tiles();

        for &row in &traversals.rows {
            for &col in &traversals.cols {
                let cell = Position::new(row, col);
                let Some(tile) = self.grid.cell_content(cell).copied() else {
                    continue;
                };

                let (farthest, next) = self.find_farthest_position(cell, direction);
                let merge = next
                    .and_then(|pos| self.grid.cell_content(pos))
                    .filter(|other| !other.is_merged())
                    .and_then(|other| tile.merge_value(other).map(|value| (*other, value)));

                if let Some((target, value)) = merge {
                    // One merge per tile: the result carries merged_from
                    let sources = [
                        cell,
                        target.previous_position.unwrap_or(target.position),
                    ];
                    self.grid
                        .insert_tile(Tile::merged(target.position, value, sources));
                    self.grid.remove_tile(cell);
                    self.score += u64::from(value);

                    events.push(GameEvent::TilesMerged {
                        from: sources,
                        into: target.position,
                        value,
                    });

                    if value == WINNING_VALUE {
                        if !self.won {
                            events.push(GameEvent::GameWon { value });
                        }
                        self.won = true;
                    }
                    moved = true;
                } else if farthest != cell {
                    self.grid.move_tile(cell, farthest);
                    events.push(GameEvent::TileMoved {
                        from: cell,
                        to: farthest,
                        value: tile.value,
                    });
                    moved = true;
                }
            }
        }

        if moved {
            if let Some(tile) = self.add_random_tile() {
                events.push(GameEvent::TileSpawned {
                    position: tile.position,
                    value: tile.value,
                });
            }

            if !self.moves_available() {
                self.over = true;
                events.push(GameEvent::GameOver {
                    final_score: self.score,
                });
            }
        }

        events
    }

    /// Slide all tiles in `direction`; returns whether the board changed
    pub fn make_move(&mut self, direction: Direction) -> bool {
        !self.apply_move(direction).is_empty()
    }

    /// Like [`make_move`](Self::make_move) with a numeric direction code
    /// (0 = Up, 1 = Right, 2 = Down, 3 = Left)
    pub fn make_move_code(&mut self, code: u8) -> Result<bool, GameError> {
        let direction = Direction::from_code(code)?;
        Ok(self.make_move(direction))
    }

    /// Snapshot of the persistent state
    pub fn serialize(&self) -> GameStateJson {
        GameStateJson {
            grid: self.grid.serialize(),
            score: self.score,
            over: self.over,
            won: self.won,
            keep_playing: self.keep_playing,
        }
    }

    /// Replace the board and flags with a stored snapshot.
    ///
    /// The snapshot must match this engine's size. On error nothing changes.
    pub fn load(&mut self, state: &GameStateJson) -> Result<(), GameError> {
        if state.grid.size != self.grid.size() {
            return Err(GameError::SizeMismatch {
                expected: self.grid.size(),
                found: state.grid.size,
            });
        }

        let grid = Grid::from_json(&state.grid)?;

        self.grid = grid;
        self.score = state.score;
        self.over = state.over;
        self.won = state.won;
        self.keep_playing = state.keep_playing;
        Ok(())
    }
}
