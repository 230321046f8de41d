//! Base2048 - a sliding tile merge puzzle engine
//!
//! This crate provides the deterministic core of a 2048-style game:
//! - Square boards of size 4, 5 or 6 with numbered tiles
//! - The slide-and-merge move with one merge per tile per move
//! - Win and game-over detection
//! - A stable serialized state for saving games and undo snapshots
//!
//! # Architecture
//!
//! The engine is pure and synchronous. Randomness is injected through
//! [`RandomSource`], so a seeded or scripted source makes every game
//! reproducible. Storage lives outside the engine behind [`GameStateStore`],
//! used by [`Session`] to keep the saved game, best score and undo snapshot.
//!
//! # Modules
//!
//! - [`coord`]: Cell positions and move directions
//! - [`tile`]: Tiles and their per-move metadata
//! - [`grid`]: Board storage and queries
//! - [`rng`]: Injectable random source
//! - [`events`]: What a move did
//! - [`game`]: The engine
//! - [`persist`]: Serialized state
//! - [`session`]: Store-backed sessions with undo
//!
//! ```
//! use base2048_core::{Direction, GameManager};
//!
//! let mut game = GameManager::seeded(4, 42).unwrap();
//! let tiles = game.grid().tile_count();
//! if game.make_move(Direction::Left) {
//!     // One spawn, minus one tile per merge
//!     assert!(game.grid().tile_count() <= tiles + 1);
//! }
//!
//! // Saved state restores into any engine of the same size
//! let mut copy = GameManager::seeded(4, 0).unwrap();
//! copy.load(&game.serialize()).unwrap();
//! assert_eq!(copy.serialize(), game.serialize());
//! ```

pub mod coord;
pub mod events;
pub mod game;
pub mod grid;
pub mod persist;
pub mod rng;
pub mod session;
pub mod tile;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use coord::{Direction, Position};
pub use events::{GameEvent, MoveRecord};
pub use game::{GameError, GameManager, START_TILES, WINNING_VALUE};
pub use grid::{Grid, SUPPORTED_SIZES};
pub use persist::{GameStateJson, GridJson, TileJson};
pub use rng::{RandomSource, ScriptedSource};
pub use session::{GameStateStore, MemoryStore, Session, SessionError, StorageKeys, StoreError};
pub use tile::{Tile, MAX_TILE_VALUE, MIN_TILE_VALUE};
