//! Key bindings.

use crossterm::event::KeyCode;
use strictly_fibonacci::Direction;

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Slide the tiles.
    Move(Direction),
    /// Start over with the current settings.
    Restart,
    /// Dismiss the win overlay and carry on.
    KeepPlaying,
    /// Leave the game.
    Quit,
}

/// Translates a key into a command. Unbound keys give `None`.
pub fn command_for(key: KeyCode) -> Option<Command> {
    let command = match key {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Command::Move(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Command::Move(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Command::Move(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Command::Move(Direction::Right)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Restart,
        KeyCode::Char('k') | KeyCode::Char('K') => Command::KeepPlaying,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}
