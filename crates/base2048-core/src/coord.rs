//! Cell coordinates and move directions for the square board.
//!
//! This module provides the foundational coordinate types:
//! - `Position`: identifies a single cell by `(row, col)`, 0-indexed from the top-left
//! - `Direction`: one of the four cardinal moves, with its fixed numeric encoding
//!
//! Positions are unsigned, so stepping off the top or left edge yields `None`
//! rather than a negative coordinate. The upper bound depends on the grid size
//! and is checked by [`Grid::within_bounds`](crate::grid::Grid::within_bounds).

use crate::game::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Row, increasing downwards
    pub row: usize,
    /// Column, increasing to the right
    pub col: usize,
}

impl Position {
    /// Create a new position
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The adjacent position one step in `direction`.
    ///
    /// Returns `None` when the step would leave the board through the top or
    /// left edge.
    pub fn step(&self, direction: Direction) -> Option<Position> {
        let (dr, dc) = direction.vector();
        Some(Position {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    /// The orthogonal neighbours of this position that do not underflow, in
    /// direction-code order
    pub fn neighbors(&self) -> impl Iterator<Item = Position> {
        let origin = *self;
        Direction::ALL
            .into_iter()
            .filter_map(move |dir| origin.step(dir))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A move direction.
///
/// The numeric encoding is a stable contract with callers and storage:
/// 0 = Up, 1 = Right, 2 = Down, 3 = Left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All directions in code order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit vector as `(row delta, col delta)`
    pub const fn vector(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// The fixed numeric code of this direction
    pub const fn code(&self) -> u8 {
        *self as u8
    }

    /// Decode a direction from its numeric code
    pub fn from_code(code: u8) -> Result<Direction, GameError> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Right),
            2 => Ok(Direction::Down),
            3 => Ok(Direction::Left),
            other => Err(GameError::InvalidDirection(other)),
        }
    }

    /// The direction pointing the other way
    pub const fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = GameError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Direction::from_code(code)
    }
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> u8 {
        direction.code()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}
