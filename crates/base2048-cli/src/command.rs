//! Player commands read from the terminal.
//!
//! Key mapping is a front-end concern: the engine only understands
//! [`Direction`] and its numeric codes.

use base2048_core::{Direction, SUPPORTED_SIZES};
use std::str::FromStr;
use thiserror::Error;

/// One line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Slide tiles
    Move(Direction),
    /// Step back one move
    Undo,
    /// Start a new game
    Restart,
    /// Keep playing after 2048
    Continue,
    /// Switch board size (starts a new game)
    Size(usize),
    /// Show the command list
    Help,
    /// Leave
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("Board size must be one of 4, 5 or 6, got {0}")]
    InvalidSize(String),
}

pub const HELP: &str = "\
Moves:    w/k/up  d/l/right  s/j/down  a/h/left  (or 0-3)
Game:     u/undo  r/restart  c/continue  size <4|5|6>
Other:    help  q/quit";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Err(CommandError::Empty);
        };
        let word = word.to_ascii_lowercase();

        let command = match word.as_str() {
            "w" | "k" | "up" => Command::Move(Direction::Up),
            "d" | "l" | "right" => Command::Move(Direction::Right),
            "s" | "j" | "down" => Command::Move(Direction::Down),
            "a" | "h" | "left" => Command::Move(Direction::Left),
            "0" | "1" | "2" | "3" => {
                let code = word.parse::<u8>().map_err(|_| CommandError::Unknown(word.clone()))?;
                Command::Move(
                    Direction::from_code(code).map_err(|_| CommandError::Unknown(word.clone()))?,
                )
            }
            "u" | "undo" => Command::Undo,
            "r" | "restart" => Command::Restart,
            "c" | "continue" => Command::Continue,
            "size" => {
                let arg = words.next().unwrap_or_default();
                match arg.parse::<usize>() {
                    Ok(size) if SUPPORTED_SIZES.contains(&size) => Command::Size(size),
                    _ => return Err(CommandError::InvalidSize(arg.to_string())),
                }
            }
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(CommandError::Unknown(word)),
        };

        Ok(command)
    }
}
