//! Application state and logic.

use crate::input::{Command, command_for};
use crate::settings::Settings;
use crate::theme::Theme;
use crossterm::event::KeyCode;
use rand::rngs::StdRng;
use strictly_fibonacci::{Direction, GameConfig, GameManager, Position, Presenter, SessionPhase};
use tracing::{debug, info, instrument};

/// Message drawn over the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// The winning level was reached.
    Won,
    /// No moves remain.
    Over,
}

/// What the screen needs to know, fed by the engine's reports.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    score: u64,
    best_score: u64,
    overlay: Option<Overlay>,
    clear_pending: bool,
    last_move: Option<Direction>,
}

impl Screen {
    fn new(best_score: u64) -> Self {
        Self {
            best_score,
            ..Self::default()
        }
    }

    /// Current score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Best score across sessions.
    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    /// Overlay to draw, if any.
    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    /// Whether the engine is waiting for the cleared board to be shown.
    pub fn clear_pending(&self) -> bool {
        self.clear_pending
    }

    /// Last direction that was played.
    pub fn last_move(&self) -> Option<Direction> {
        self.last_move
    }
}

impl Presenter for Screen {
    fn on_score_changed(&mut self, score: u64) {
        self.score = score;
        if score > self.best_score {
            self.best_score = score;
        }
    }

    fn on_game_won(&mut self) {
        self.overlay = Some(Overlay::Won);
    }

    fn on_game_over(&mut self) {
        self.overlay = Some(Overlay::Over);
    }

    fn on_tile_inserted(&mut self, position: Position, level: u32) {
        debug!(%position, level, "Tile inserted");
    }

    fn on_clear_begun(&mut self) {
        self.clear_pending = true;
        self.overlay = None;
    }
}

/// Main application state.
pub struct App {
    game: GameManager<Screen>,
    settings: Settings,
    should_quit: bool,
}

impl App {
    /// Creates the app and starts the first session.
    #[instrument(skip(settings, rng))]
    pub fn new(config: GameConfig, settings: Settings, rng: StdRng) -> Self {
        let screen = Screen::new(*settings.best_score());
        let mut game = GameManager::with_rng(config, screen, rng);
        game.start_new_session(config);
        Self {
            game,
            settings,
            should_quit: false,
        }
    }

    /// Returns the running game.
    pub fn game(&self) -> &GameManager<Screen> {
        &self.game
    }

    /// Returns what the screen shows.
    pub fn screen(&self) -> &Screen {
        self.game.presenter()
    }

    /// Returns the theme in use.
    pub fn theme(&self) -> Theme {
        *self.settings.theme()
    }

    /// Whether the player asked to leave.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Handles one key press.
    #[instrument(skip(self))]
    pub fn handle_key(&mut self, key: KeyCode) {
        let Some(command) = command_for(key) else {
            return;
        };

        match command {
            Command::Move(direction) => {
                if self.screen().overlay() == Some(Overlay::Won) {
                    debug!("Win overlay showing; move ignored");
                    return;
                }
                // The engine only takes moves between clears and before game over.
                let accepted = self.game.phase() == SessionPhase::Idle;
                self.game.move_to(direction);
                if accepted {
                    self.game.presenter_mut().last_move = Some(direction);
                }
            }
            Command::Restart => self.restart(),
            Command::KeepPlaying => {
                if self.screen().overlay() == Some(Overlay::Won) {
                    self.game.presenter_mut().overlay = None;
                }
            }
            Command::Quit => {
                info!("Quit requested");
                self.should_quit = true;
            }
        }
    }

    /// Starts a new session with the current configuration.
    pub fn restart(&mut self) {
        info!("Restarting game");
        let config = self.game.config();
        self.game.start_new_session(config);
        self.game.presenter_mut().last_move = None;
    }

    /// Tells the engine the cleared board has been drawn.
    pub fn finish_clear(&mut self) {
        if self.screen().clear_pending() {
            self.game.presenter_mut().clear_pending = false;
            self.game.on_cleared();
        }
    }

    /// Consumes the app, returning the settings with the best score
    /// brought up to date.
    pub fn into_settings(self) -> Settings {
        let best = self.screen().best_score();
        let mut settings = self.settings;
        settings.record_score(best);
        settings
    }
}
