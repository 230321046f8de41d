//! Saved games, best score and undo.
//!
//! A `Session` wraps one engine together with a key-value store. After every
//! change it writes the current game and the best score back to the store,
//! and it keeps a single undo snapshot taken just before the last move.
//!
//! The engine itself never touches storage; the store is a narrow
//! [`GameStateStore`] capability handed to the session.

use crate::coord::Direction;
use crate::events::{score_gained, MoveRecord};
use crate::game::{GameError, GameManager};
use crate::grid::SUPPORTED_SIZES;
use crate::persist::GameStateJson;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Board size used when none has been stored
pub const DEFAULT_GRID_SIZE: usize = 4;

/// Keys under which the session keeps its values
pub struct StorageKeys;

impl StorageKeys {
    pub const GRID_SIZE: &'static str = "base2048_grid_size";
    pub const BEST_SCORE: &'static str = "base2048_best_score";
    pub const GAME_STATE: &'static str = "base2048_game_state";
    pub const PREV_GAME_STATE: &'static str = "base2048_prev_game_state";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage
pub trait GameStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-process store, for tests and hosts without persistence
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GameStateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to encode game state: {0}")]
    Codec(#[from] serde_json::Error),
}

/// One player's game backed by a store
pub struct Session<S, R = StdRng> {
    store: S,
    game: GameManager<R>,
    best_score: u64,
    previous: Option<GameStateJson>,
    moves: u64,
}

impl<S: GameStateStore> Session<S, StdRng> {
    /// Open a session seeded from OS entropy
    pub fn open(store: S) -> Result<Self, SessionError> {
        Self::open_with_rng(store, StdRng::from_entropy())
    }
}

impl<S: GameStateStore, R: RngCore + SeedableRng> Session<S, R> {
    /// Open a session, restoring whatever the store holds.
    ///
    /// A stored game or undo snapshot that cannot be decoded or does not fit
    /// the stored grid size is dropped with a warning and a fresh game starts.
    pub fn open_with_rng(mut store: S, rng: R) -> Result<Self, SessionError> {
        let size = match store.get(StorageKeys::GRID_SIZE)? {
            Some(text) => match text.trim().parse::<usize>() {
                Ok(size) if SUPPORTED_SIZES.contains(&size) => size,
                _ => {
                    warn!(stored = %text, "ignoring invalid grid size");
                    DEFAULT_GRID_SIZE
                }
            },
            None => DEFAULT_GRID_SIZE,
        };

        let best_score = store
            .get(StorageKeys::BEST_SCORE)?
            .and_then(|text| text.trim().parse().ok())
            .unwrap_or(0);

        let mut game = GameManager::with_rng(size, rng)?;

        if let Some(state) = read_state(&mut store, StorageKeys::GAME_STATE)? {
            match game.load(&state) {
                Ok(()) => debug!(score = state.score, "restored saved game"),
                Err(e) => {
                    warn!(error = %e, "discarding saved game");
                    store.remove(StorageKeys::GAME_STATE)?;
                }
            }
        }

        let previous = match read_state(&mut store, StorageKeys::PREV_GAME_STATE)? {
            Some(state) if state.grid.size == size => Some(state),
            Some(state) => {
                warn!(
                    expected = size,
                    found = state.grid.size,
                    "discarding undo snapshot for another grid size"
                );
                store.remove(StorageKeys::PREV_GAME_STATE)?;
                None
            }
            None => None,
        };

        let mut session = Self {
            store,
            game,
            best_score,
            previous,
            moves: 0,
        };
        session.persist()?;
        Ok(session)
    }

    /// The engine, for reading the board and flags
    pub fn game(&self) -> &GameManager<R> {
        &self.game
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Accepted moves in the current game since the session was opened.
    /// Undo takes one back; restart and size changes reset it.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn can_undo(&self) -> bool {
        self.previous.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Play a move, saving an undo snapshot first when the board changes
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveRecord, SessionError> {
        let snapshot = self.game.serialize();
        let events = self.game.apply_move(direction);

        if events.is_empty() {
            return Ok(MoveRecord::new(direction, events));
        }

        debug!(
            %direction,
            gained = score_gained(&events),
            score = self.game.score(),
            "move applied"
        );

        self.moves += 1;
        self.set_previous(Some(snapshot))?;
        self.persist()?;
        Ok(MoveRecord::new(direction, events))
    }

    /// Play a move; returns whether the board changed
    pub fn make_move(&mut self, direction: Direction) -> Result<bool, SessionError> {
        Ok(self.apply_move(direction)?.moved())
    }

    /// Return to the state before the last move. Only one step is kept.
    pub fn undo(&mut self) -> Result<bool, SessionError> {
        let Some(previous) = self.previous.take() else {
            return Ok(false);
        };

        self.store.remove(StorageKeys::PREV_GAME_STATE)?;
        self.game.load(&previous)?;
        self.moves = self.moves.saturating_sub(1);
        debug!(score = self.game.score(), "undid last move");
        self.persist()?;
        Ok(true)
    }

    /// Start a new game of the current size
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.game.restart();
        self.moves = 0;
        self.set_previous(None)?;
        debug!(size = self.game.size(), "restarted");
        self.persist()
    }

    /// Keep playing after winning
    pub fn keep_playing(&mut self) -> Result<(), SessionError> {
        self.game.continue_after_win();
        self.persist()
    }

    /// Switch to a new board size, starting a fresh game.
    ///
    /// The engine's size is fixed, so this replaces it.
    pub fn set_grid_size(&mut self, size: usize) -> Result<(), SessionError> {
        if !SUPPORTED_SIZES.contains(&size) {
            return Err(GameError::UnsupportedSize(size).into());
        }

        let rng = R::seed_from_u64(self.game.rng_mut().next_u64());
        self.game = GameManager::with_rng(size, rng)?;
        self.moves = 0;
        self.store
            .set(StorageKeys::GRID_SIZE, &size.to_string())?;
        self.set_previous(None)?;
        debug!(size, "grid size changed");
        self.persist()
    }

    fn set_previous(&mut self, state: Option<GameStateJson>) -> Result<(), SessionError> {
        match &state {
            Some(state) => self
                .store
                .set(StorageKeys::PREV_GAME_STATE, &state.to_json()?)?,
            None => self.store.remove(StorageKeys::PREV_GAME_STATE)?,
        }
        self.previous = state;
        Ok(())
    }

    /// Write best score and current game. A finished game is removed so the
    /// next session starts fresh.
    fn persist(&mut self) -> Result<(), SessionError> {
        let score = self.game.score();
        if score > self.best_score {
            self.best_score = score;
            self.store
                .set(StorageKeys::BEST_SCORE, &score.to_string())?;
        }

        if self.game.is_over() {
            self.store.remove(StorageKeys::GAME_STATE)?;
        } else {
            let state = self.game.serialize().to_json()?;
            self.store.set(StorageKeys::GAME_STATE, &state)?;
        }
        Ok(())
    }
}

/// Read and decode a stored state, dropping it with a warning if it is corrupt
fn read_state<S: GameStateStore>(
    store: &mut S,
    key: &str,
) -> Result<Option<GameStateJson>, StoreError> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };

    match GameStateJson::from_json(&text) {
        Ok(state) => Ok(Some(state)),
        Err(e) => {
            warn!(key, error = %e, "discarding unreadable state");
            store.remove(key)?;
            Ok(None)
        }
    }
}
