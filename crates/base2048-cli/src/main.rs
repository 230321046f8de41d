//! Base2048 terminal game.

use base2048_core::{GameStateStore, Session};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{self, BufRead, Write};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod config;
mod store;

use command::{Command, CommandError, HELP};
use config::Config;
use store::FileStore;

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr so they don't interleave with the board
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!(save_dir = %config.save_dir.display(), seeded = config.seed.is_some(), "Starting Base2048...");

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::open_with_rng(FileStore::new(&config.save_dir), rng)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(&mut session, stdin.lock(), stdout.lock())
}

/// Read commands until `quit` or end of input, printing the board after each
fn run<S, R, I, O>(session: &mut Session<S, R>, input: I, mut out: O) -> anyhow::Result<()>
where
    S: GameStateStore,
    R: RngCore + SeedableRng,
    I: BufRead,
    O: Write,
{
    print_status(session, &mut out)?;

    for line in input.lines() {
        let command = match line?.parse::<Command>() {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        match command {
            Command::Move(direction) => {
                if session.game().is_terminated() {
                    writeln!(out, "The game has ended. 'r' to restart, 'u' to undo.")?;
                    continue;
                }
                if !session.make_move(direction)? {
                    writeln!(out, "Nothing moves {}.", direction)?;
                    continue;
                }
            }
            Command::Undo => {
                if !session.undo()? {
                    writeln!(out, "Nothing to undo.")?;
                    continue;
                }
            }
            Command::Restart => session.restart()?,
            Command::Continue => {
                if !session.game().is_won() {
                    writeln!(out, "Nothing to continue.")?;
                    continue;
                }
                session.keep_playing()?;
            }
            Command::Size(size) => session.set_grid_size(size)?,
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            Command::Quit => break,
        }

        print_status(session, &mut out)?;
    }

    if let Err(e) = out.flush() {
        warn!(error = %e, "failed to flush output");
    }
    Ok(())
}

fn print_status<S, R, O>(session: &Session<S, R>, out: &mut O) -> io::Result<()>
where
    S: GameStateStore,
    R: RngCore + SeedableRng,
    O: Write,
{
    let game = session.game();
    writeln!(out)?;
    writeln!(out, "{}", game.grid())?;
    writeln!(
        out,
        "score {}  best {}  moves {}",
        game.score(),
        session.best_score(),
        session.moves()
    )?;

    if game.is_over() {
        writeln!(out, "Game over! 'r' to restart.")?;
    } else if game.is_won() && !game.keep_playing() {
        writeln!(out, "You reached 2048! 'c' to keep playing, 'r' to restart.")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base2048_core::{Direction, MemoryStore};
    use std::io::Cursor;

    fn session() -> Session<MemoryStore> {
        Session::open_with_rng(MemoryStore::new(), StdRng::seed_from_u64(5)).unwrap()
    }

    fn play(session: &mut Session<MemoryStore>, script: &str) -> String {
        let mut out = Vec::new();
        run(session, Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut session = session();
        let before = session.game().serialize();
        let output = play(&mut session, "q\nsize 6\n");
        assert_eq!(session.game().serialize(), before);
        assert!(output.contains("score 0"));
    }

    #[test]
    fn test_moves_and_undo() {
        let mut session = session();
        let first = session.game().serialize();
        let direction = session.game().available_moves()[0];
        let key = match direction {
            Direction::Up => "w",
            Direction::Right => "d",
            Direction::Down => "s",
            Direction::Left => "a",
        };

        let output = play(&mut session, &format!("{}\n", key));
        assert!(output.contains("moves 1"));
        assert_ne!(session.game().serialize(), first);
        assert!(session.can_undo());

        play(&mut session, "u\n");
        assert_eq!(session.game().serialize(), first);

        let output = play(&mut session, "undo\n");
        assert!(output.contains("Nothing to undo."));
    }

    #[test]
    fn test_bad_input_is_reported() {
        let mut session = session();
        let output = play(&mut session, "\njump\nsize 3\nhelp\n");
        assert!(output.contains("Unknown command: jump"));
        assert!(output.contains("Board size must be one of 4, 5 or 6"));
        assert!(output.contains("Moves:"));
    }

    #[test]
    fn test_size_command_starts_new_board() {
        let mut session = session();
        play(&mut session, "size 5\n");
        assert_eq!(session.game().size(), 5);
        assert_eq!(session.game().grid().tile_count(), 2);
    }

    #[test]
    fn test_continue_requires_a_win() {
        let mut session = session();
        let output = play(&mut session, "c\n");
        assert!(output.contains("Nothing to continue."));
    }
}
