//! WebAssembly bindings for the Base2048 engine.
//!
//! This module exposes the game engine to JavaScript through wasm-bindgen.
//! Storage stays on the JavaScript side: the page saves `getState()` output
//! and hands it back through `loadState()`.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use crate::game::GameManager;
#[cfg(feature = "wasm")]
use crate::persist::GameStateJson;

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub struct WasmGame {
    game: GameManager,
}

#[cfg(feature = "wasm")]
#[wasm_bindgen]
impl WasmGame {
    /// Create a new game on a board of the given size (4, 5 or 6)
    #[wasm_bindgen(constructor)]
    pub fn new(size: usize) -> Result<WasmGame, JsValue> {
        let game = GameManager::new(size).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WasmGame { game })
    }

    /// Move in a direction (0 = up, 1 = right, 2 = down, 3 = left).
    /// Returns whether the board changed.
    #[wasm_bindgen(js_name = "move")]
    pub fn make_move(&mut self, direction: u8) -> Result<bool, JsValue> {
        self.game
            .make_move_code(direction)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Move and return the resulting events as JSON
    #[wasm_bindgen(js_name = applyMove)]
    pub fn apply_move(&mut self, direction: u8) -> Result<String, JsValue> {
        let direction = crate::coord::Direction::from_code(direction)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let events = self.game.apply_move(direction);
        Ok(serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string()))
    }

    /// Start a new game of the same size
    pub fn restart(&mut self) {
        self.game.restart();
    }

    /// Keep playing after reaching 2048
    #[wasm_bindgen(js_name = continueGame)]
    pub fn continue_game(&mut self) {
        self.game.continue_after_win();
    }

    /// Whether moves are currently ignored
    #[wasm_bindgen(js_name = isTerminated)]
    pub fn is_terminated(&self) -> bool {
        self.game.is_terminated()
    }

    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> f64 {
        self.game.score() as f64
    }

    #[wasm_bindgen(js_name = isOver)]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    #[wasm_bindgen(js_name = isWon)]
    pub fn is_won(&self) -> bool {
        self.game.is_won()
    }

    /// Get the full game state as JSON, in the stored format
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        self.game
            .serialize()
            .to_json()
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the board as a JSON array of rows, `null` for empty cells
    #[wasm_bindgen(js_name = getGrid)]
    pub fn get_grid(&self) -> String {
        serde_json::to_string(&self.game.grid().values()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Get the directions that would change the board as a JSON array of codes
    #[wasm_bindgen(js_name = getAvailableMoves)]
    pub fn get_available_moves(&self) -> String {
        let codes: Vec<u8> = self
            .game
            .available_moves()
            .into_iter()
            .map(|d| d.code())
            .collect();
        serde_json::to_string(&codes).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace the game with a state previously returned by `getState`
    #[wasm_bindgen(js_name = loadState)]
    pub fn load_state(&mut self, state_json: &str) -> Result<(), JsValue> {
        let state = GameStateJson::from_json(state_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid state JSON: {}", e)))?;
        self.game
            .load(&state)
            .map_err(|e| JsValue::from_str(&format!("Load failed: {}", e)))
    }
}
