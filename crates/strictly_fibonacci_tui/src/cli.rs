//! Command-line interface for strictly_fibonacci.

use crate::settings::DEFAULT_SETTINGS_FILE;
use crate::theme::Theme;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_fibonacci::GameType;

/// Strictly Fibonacci - 2048 with powers of two, powers of three or
/// Fibonacci numbers
#[derive(Parser, Debug)]
#[command(name = "strictly_fibonacci")]
#[command(about = "Tile-merging puzzle in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Board size (3, 4 or 5); stored for next time
        #[arg(long)]
        board_size: Option<usize>,

        /// power-of-2, power-of-3 or fibonacci; stored for next time
        #[arg(long)]
        game_type: Option<GameType>,

        /// default, vibrant or joyful; stored for next time
        #[arg(long)]
        theme: Option<Theme>,

        /// Settings file (created on exit if missing)
        #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
        settings: PathBuf,

        /// Seed for tile placement
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play random games without a terminal and report the results
    Simulate {
        /// Number of games
        #[arg(short = 'n', long, default_value = "100")]
        games: usize,

        /// Seed of the first game
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Board size (3, 4 or 5)
        #[arg(long, default_value = "4")]
        board_size: usize,

        /// power-of-2, power-of-3 or fibonacci
        #[arg(long, default_value = "power-of-2")]
        game_type: GameType,

        /// Give up on a game after this many moves
        #[arg(long, default_value = "10000")]
        max_moves: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Play {
            board_size: None,
            game_type: None,
            theme: None,
            settings: PathBuf::from(DEFAULT_SETTINGS_FILE),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_play() {
        let cli = Cli::try_parse_from(["strictly_fibonacci"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(Command::default(), Command::Play { seed: None, .. }));
    }

    #[test]
    fn test_play_overrides_parse() {
        let cli = Cli::try_parse_from([
            "strictly_fibonacci",
            "play",
            "--board-size",
            "5",
            "--game-type",
            "fibonacci",
            "--theme",
            "joyful",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Play {
                board_size,
                game_type,
                theme,
                settings,
                ..
            }) => {
                assert_eq!(board_size, Some(5));
                assert_eq!(game_type, Some(GameType::Fibonacci));
                assert_eq!(theme, Some(Theme::Joyful));
                assert_eq!(settings, PathBuf::from(DEFAULT_SETTINGS_FILE));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_simulate_defaults() {
        let cli = Cli::try_parse_from(["strictly_fibonacci", "simulate", "-n", "3", "--json"])
            .unwrap();
        match cli.command {
            Some(Command::Simulate {
                games,
                game_type,
                board_size,
                json,
                ..
            }) => {
                assert_eq!(games, 3);
                assert_eq!(game_type, GameType::PowerOf2);
                assert_eq!(board_size, 4);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_game_type_rejected() {
        let result = Cli::try_parse_from(["strictly_fibonacci", "simulate", "--game-type", "hex"]);
        assert!(result.is_err());
    }
}
