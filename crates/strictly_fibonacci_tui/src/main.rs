//! Strictly Fibonacci - terminal front end
//!
//! Plays the game in the terminal or simulates random games headlessly.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod app;
mod cli;
mod input;
mod settings;
mod simulate;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use cli::{Cli, Command};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::Settings;
use std::io;
use std::path::PathBuf;
use strictly_fibonacci::{GameConfig, GameType};
use theme::Theme;
use tracing::{error, info, instrument};
use tracing_subscriber::EnvFilter;

/// Log file of the interactive game.
const LOG_FILE: &str = "strictly_fibonacci.log";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Command::Play {
            board_size,
            game_type,
            theme,
            settings,
            seed,
        } => run_play(board_size, game_type, theme, settings, seed),
        Command::Simulate {
            games,
            seed,
            board_size,
            game_type,
            max_moves,
            json,
        } => run_simulate(games, seed, board_size, game_type, max_moves, json),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Run the interactive game
#[instrument(skip(settings_path), fields(settings = %settings_path.display()))]
fn run_play(
    board_size: Option<usize>,
    game_type: Option<GameType>,
    theme: Option<Theme>,
    settings_path: PathBuf,
    seed: Option<u64>,
) -> Result<()> {
    // Log to a file so the alternate screen stays clean
    let log_file = std::fs::File::create(LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();

    info!("Starting Strictly Fibonacci");

    let mut settings = Settings::load(&settings_path)?;
    if let Some(board_size) = board_size {
        settings.set_board_size(board_size);
    }
    if let Some(game_type) = game_type {
        settings.set_game_type(game_type);
    }
    if let Some(theme) = theme {
        settings.set_theme(theme);
    }
    let config = settings.game_config()?;
    settings.save(&settings_path)?;

    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut app = App::new(config, settings, rng);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_game_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }

    let settings = app.into_settings();
    settings.save(&settings_path)?;
    info!(best_score = *settings.best_score(), "Settings saved on exit");

    res
}

fn run_game_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        // The cleared board has been shown; let the engine deal the
        // opening tiles.
        if app.screen().clear_pending() {
            app.finish_clear();
            continue;
        }

        if app.should_quit() {
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }
    }
}

/// Run headless random games
#[instrument]
fn run_simulate(
    games: usize,
    seed: u64,
    board_size: usize,
    game_type: GameType,
    max_moves: usize,
    json: bool,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .init();

    let config = GameConfig::new(board_size, game_type)?;
    let report = simulate::run(config, games, seed, max_moves);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.to_table());
    }
    Ok(())
}
