//! Square board storage.
//!
//! This module contains:
//! - `Grid`: a fixed-size, row-major store of optional tiles
//! - Bounds and availability queries used by the move algorithm
//! - Random empty-cell selection for spawning
//! - Conversion to and from the serialized grid shape

use crate::coord::Position;
use crate::game::GameError;
use crate::persist::{GridJson, TileJson};
use crate::rng::RandomSource;
use crate::tile::Tile;
use std::fmt;
use std::ops::RangeInclusive;

/// Board sizes an engine can be built with
pub const SUPPORTED_SIZES: RangeInclusive<usize> = 4..=6;

/// The board: `size * size` cells, each holding at most one tile.
///
/// A stored tile's `position` always equals the cell that holds it. All
/// mutation goes through methods that keep this true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Side length
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }

    /// Whether `pos` lies on the board
    pub fn within_bounds(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// The tile at `pos`, if any. Out-of-bounds positions are empty.
    pub fn cell_content(&self, pos: Position) -> Option<&Tile> {
        if !self.within_bounds(pos) {
            return None;
        }
        self.cells[self.index(pos)].as_ref()
    }

    /// Whether `pos` is on the board and holds a tile
    pub fn cell_occupied(&self, pos: Position) -> bool {
        self.cell_content(pos).is_some()
    }

    /// Whether `pos` is on the board and empty
    pub fn cell_available(&self, pos: Position) -> bool {
        self.within_bounds(pos) && !self.cell_occupied(pos)
    }

    /// Whether any cell is empty
    pub fn cells_available(&self) -> bool {
        self.cells.iter().any(Option::is_none)
    }

    /// All empty cells in row-major order
    pub fn available_cells(&self) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.cells[self.index(pos)].is_none())
            .collect()
    }

    /// Pick one empty cell uniformly at random
    pub fn random_available_cell<R: RandomSource + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Position, GameError> {
        let cells = self.available_cells();
        if cells.is_empty() {
            return Err(GameError::NoAvailableCell);
        }
        Ok(cells[rng.choose_index(cells.len())])
    }

    /// Place `tile` at its own position, replacing whatever was there.
    ///
    /// Out-of-bounds tiles are ignored.
    pub fn insert_tile(&mut self, tile: Tile) {
        if self.within_bounds(tile.position) {
            let index = self.index(tile.position);
            self.cells[index] = Some(tile);
        }
    }

    /// Clear the cell at `pos`, returning the tile it held
    pub fn remove_tile(&mut self, pos: Position) -> Option<Tile> {
        if !self.within_bounds(pos) {
            return None;
        }
        let index = self.index(pos);
        self.cells[index].take()
    }

    /// Relocate the tile at `from` to `to`, updating its position.
    ///
    /// Returns `false` and leaves the grid untouched when `from` is empty or
    /// `to` is off the board.
    pub fn move_tile(&mut self, from: Position, to: Position) -> bool {
        if from == to {
            return self.cell_occupied(from);
        }
        if !self.within_bounds(to) {
            return false;
        }
        match self.remove_tile(from) {
            Some(mut tile) => {
                tile.position = to;
                self.insert_tile(tile);
                true
            }
            None => false,
        }
    }

    /// Every position on the board in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Position::new(row, col)))
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().flatten()
    }

    /// Mutable access to every tile, for per-move bookkeeping that does not
    /// change positions
    pub(crate) fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut().flatten()
    }

    /// Number of tiles on the board
    pub fn tile_count(&self) -> usize {
        self.tiles().count()
    }

    /// Sum of all tile values
    pub fn value_sum(&self) -> u64 {
        self.tiles().map(|t| u64::from(t.value)).sum()
    }

    /// Largest tile value, or 0 on an empty board
    pub fn max_value(&self) -> u32 {
        self.tiles().map(|t| t.value).max().unwrap_or(0)
    }

    /// Whether two orthogonally adjacent tiles share a value.
    ///
    /// Every occupied cell checks all four neighbours.
    pub fn tile_matches_available(&self) -> bool {
        self.tiles().any(|tile| {
            tile.position
                .neighbors()
                .filter_map(|pos| self.cell_content(pos))
                .any(|other| tile.can_merge_with(other))
        })
    }

    /// Values as rows of `Option<u32>`, top to bottom
    pub fn values(&self) -> Vec<Vec<Option<u32>>> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|cell| cell.map(|t| t.value)).collect())
            .collect()
    }

    /// Build a grid from rows of values, 0 meaning empty.
    ///
    /// The board must be square and every non-zero value must be a legal
    /// tile value.
    pub fn from_values<const N: usize>(rows: &[[u32; N]]) -> Result<Self, GameError> {
        if rows.len() != N {
            return Err(GameError::MalformedState(format!(
                "{} rows of {} cells is not square",
                rows.len(),
                N
            )));
        }
        let mut grid = Grid::new(N);
        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if value == 0 {
                    continue;
                }
                if !Tile::is_valid_value(value) {
                    return Err(GameError::MalformedState(format!(
                        "invalid tile value {} at ({}, {})",
                        value, row, col
                    )));
                }
                grid.insert_tile(Tile::new(Position::new(row, col), value));
            }
        }
        Ok(grid)
    }

    /// Row-major serialized form. Move metadata is not included.
    pub fn serialize(&self) -> GridJson {
        GridJson {
            size: self.size,
            cells: self
                .cells
                .iter()
                .map(|cell| {
                    cell.map(|tile| TileJson {
                        position: tile.position,
                        value: tile.value,
                    })
                })
                .collect(),
        }
    }

    /// Rebuild a grid from its serialized form.
    ///
    /// The cell list must hold exactly `size * size` entries and each tile
    /// must sit in the slot matching its position.
    pub fn from_json(json: &GridJson) -> Result<Self, GameError> {
        if !SUPPORTED_SIZES.contains(&json.size) {
            return Err(GameError::UnsupportedSize(json.size));
        }

        let expected = json.size * json.size;
        if json.cells.len() != expected {
            return Err(GameError::MalformedState(format!(
                "expected {} cells, found {}",
                expected,
                json.cells.len()
            )));
        }

        let mut grid = Grid::new(json.size);
        for (pos, cell) in grid.positions().zip(&json.cells) {
            let Some(tile) = cell else { continue };

            if tile.position != pos {
                return Err(GameError::MalformedState(format!(
                    "tile at {} stored in slot {}",
                    tile.position, pos
                )));
            }
            if !Tile::is_valid_value(tile.value) {
                return Err(GameError::MalformedState(format!(
                    "invalid tile value {} at {}",
                    tile.value, pos
                )));
            }

            grid.insert_tile(Tile::new(pos, tile.value));
        }

        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.values().iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(value) => format!("{:>5}", value),
                    None => format!("{:>5}", "."),
                })
                .collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = Grid::new(4);
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.tile_count(), 0);
        assert!(grid.cells_available());
        assert_eq!(grid.available_cells().len(), 16);
    }

    #[test]
    fn test_bounds() {
        let grid = Grid::new(5);
        assert!(grid.within_bounds(Position::new(0, 0)));
        assert!(grid.within_bounds(Position::new(4, 4)));
        assert!(!grid.within_bounds(Position::new(5, 0)));
        assert!(!grid.within_bounds(Position::new(0, 5)));
        assert!(!grid.cell_available(Position::new(5, 5)));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut grid = Grid::new(4);
        let pos = Position::new(1, 2);
        grid.insert_tile(Tile::new(pos, 4));

        assert!(!grid.cell_available(pos));
        assert_eq!(grid.cell_content(pos).map(|t| t.value), Some(4));
        assert_eq!(grid.available_cells().len(), 15);

        let removed = grid.remove_tile(pos).unwrap();
        assert_eq!(removed.value, 4);
        assert!(grid.cell_available(pos));
        assert_eq!(grid.remove_tile(pos), None);
    }

    #[test]
    fn test_move_tile_updates_position() {
        let mut grid = Grid::new(4);
        grid.insert_tile(Tile::new(Position::new(3, 3), 2));

        assert!(grid.move_tile(Position::new(3, 3), Position::new(3, 0)));
        let tile = grid.cell_content(Position::new(3, 0)).unwrap();
        assert_eq!(tile.position, Position::new(3, 0));
        assert!(grid.cell_available(Position::new(3, 3)));

        assert!(!grid.move_tile(Position::new(2, 2), Position::new(0, 0)));
        assert!(!grid.move_tile(Position::new(3, 0), Position::new(4, 0)));
        assert!(grid.cell_occupied(Position::new(3, 0)));
    }

    #[test]
    fn test_random_available_cell_is_uniform_over_empty() {
        let mut grid = Grid::from_values(&[
            [2, 0, 2, 2],
            [2, 2, 2, 2],
            [2, 2, 2, 0],
            [2, 2, 2, 2],
        ])
        .unwrap();

        let mut rng = ScriptedSource::new(vec![0.0, 0.75]);
        assert_eq!(grid.random_available_cell(&mut rng).unwrap(), Position::new(0, 1));
        assert_eq!(grid.random_available_cell(&mut rng).unwrap(), Position::new(2, 3));

        grid.insert_tile(Tile::new(Position::new(0, 1), 4));
        grid.insert_tile(Tile::new(Position::new(2, 3), 4));
        assert!(!grid.cells_available());
        assert!(matches!(
            grid.random_available_cell(&mut rng),
            Err(GameError::NoAvailableCell)
        ));
    }

    #[test]
    fn test_tile_matches_available() {
        let checkerboard = Grid::from_values(&[
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ])
        .unwrap();
        assert!(!checkerboard.tile_matches_available());

        // Only pair sits in the last column, found from either tile
        let vertical_pair = Grid::from_values(&[
            [2, 4, 2, 4],
            [4, 2, 4, 8],
            [2, 4, 2, 8],
            [4, 2, 4, 2],
        ])
        .unwrap();
        assert!(vertical_pair.tile_matches_available());
    }

    #[test]
    fn test_from_values_rejects_bad_input() {
        assert!(matches!(
            Grid::from_values(&[[2, 0, 0], [0, 0, 0]]),
            Err(GameError::MalformedState(_))
        ));
        assert!(matches!(
            Grid::from_values(&[[3, 0], [0, 0]]),
            Err(GameError::MalformedState(_))
        ));
    }

    #[test]
    fn test_serialize_round_trip() {
        let grid = Grid::from_values(&[
            [2, 0, 0, 0],
            [0, 4, 0, 0],
            [0, 0, 8, 0],
            [0, 0, 0, 2048],
        ])
        .unwrap();

        let json = grid.serialize();
        assert_eq!(json.size, 4);
        assert_eq!(json.cells.len(), 16);
        assert_eq!(
            json.cells[5],
            Some(TileJson {
                position: Position::new(1, 1),
                value: 4
            })
        );
        assert_eq!(json.cells[1], None);

        assert_eq!(Grid::from_json(&json).unwrap(), grid);
    }

    #[test]
    fn test_from_json_rejects_misplaced_tile() {
        let mut json = Grid::new(4).serialize();
        json.cells[0] = Some(TileJson {
            position: Position::new(2, 2),
            value: 2,
        });
        assert!(matches!(
            Grid::from_json(&json),
            Err(GameError::MalformedState(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_bad_sizes() {
        let mut json = Grid::new(4).serialize();
        json.cells.pop();
        assert!(matches!(
            Grid::from_json(&json),
            Err(GameError::MalformedState(_))
        ));

        let json = Grid::new(3).serialize();
        assert!(matches!(
            Grid::from_json(&json),
            Err(GameError::UnsupportedSize(3))
        ));
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_values(&[
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 16],
        ])
        .unwrap();
        let text = grid.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["2", ".", ".", "."]);
        assert_eq!(lines[3].split_whitespace().collect::<Vec<_>>(), [".", ".", ".", "16"]);
    }
}
