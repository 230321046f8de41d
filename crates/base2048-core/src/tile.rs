//! Numbered tiles.

use crate::coord::Position;
use serde::{Deserialize, Serialize};

/// Smallest value a tile can hold
pub const MIN_TILE_VALUE: u32 = 2;

/// Largest value a tile can hold. Two tiles of this value do not merge.
pub const MAX_TILE_VALUE: u32 = 1 << 31;

/// A single numbered tile on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Cell currently holding this tile
    pub position: Position,
    /// Power of two, at least 2
    pub value: u32,
    /// Where this tile was before the current move started
    pub previous_position: Option<Position>,
    /// Pre-move positions of the two tiles that merged into this one during the
    /// current move. Doubles as the "already merged" marker.
    pub merged_from: Option<[Position; 2]>,
}

impl Tile {
    /// Create a fresh tile with no move history
    pub const fn new(position: Position, value: u32) -> Self {
        Self {
            position,
            value,
            previous_position: None,
            merged_from: None,
        }
    }

    /// Create the tile produced by merging two equal tiles
    pub const fn merged(position: Position, value: u32, sources: [Position; 2]) -> Self {
        Self {
            position,
            value,
            previous_position: None,
            merged_from: Some(sources),
        }
    }

    /// Whether this tile was created by a merge during the current move
    pub fn is_merged(&self) -> bool {
        self.merged_from.is_some()
    }

    /// Record the current position and forget merge provenance.
    ///
    /// Called once per tile before a move is processed.
    pub fn prepare_for_move(&mut self) {
        self.merged_from = None;
        self.previous_position = Some(self.position);
    }

    /// Whether `value` is a legal tile value
    pub fn is_valid_value(value: u32) -> bool {
        (MIN_TILE_VALUE..=MAX_TILE_VALUE).contains(&value) && value.is_power_of_two()
    }

    /// Value of the tile produced by merging `self` with `other`, if they can
    /// merge: equal values whose double still fits a tile.
    pub fn merge_value(&self, other: &Tile) -> Option<u32> {
        if self.value != other.value {
            return None;
        }
        self.value
            .checked_mul(2)
            .filter(|&value| value <= MAX_TILE_VALUE)
    }

    pub fn can_merge_with(&self, other: &Tile) -> bool {
        self.merge_value(other).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_for_move_resets_provenance() {
        let mut tile = Tile::merged(
            Position::new(0, 0),
            8,
            [Position::new(0, 1), Position::new(0, 0)],
        );
        assert!(tile.is_merged());

        tile.prepare_for_move();
        assert!(!tile.is_merged());
        assert_eq!(tile.previous_position, Some(Position::new(0, 0)));
    }

    #[test]
    fn test_valid_values() {
        assert!(Tile::is_valid_value(2));
        assert!(Tile::is_valid_value(2048));
        assert!(Tile::is_valid_value(131072));
        assert!(!Tile::is_valid_value(0));
        assert!(!Tile::is_valid_value(1));
        assert!(!Tile::is_valid_value(6));
        assert!(Tile::is_valid_value(MAX_TILE_VALUE));
    }

    #[test]
    fn test_merge_value_stops_at_max() {
        let pos = Position::new(0, 0);
        let two = Tile::new(pos, 2);
        assert_eq!(two.merge_value(&Tile::new(pos, 2)), Some(4));
        assert_eq!(two.merge_value(&Tile::new(pos, 4)), None);

        let half = Tile::new(pos, MAX_TILE_VALUE / 2);
        assert_eq!(half.merge_value(&half), Some(MAX_TILE_VALUE));

        let max = Tile::new(pos, MAX_TILE_VALUE);
        assert_eq!(max.merge_value(&max), None);
        assert!(!max.can_merge_with(&max));
    }
}
