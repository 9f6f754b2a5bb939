//! Persisted player settings.
//!
//! Stored as TOML next to the binary by default. A missing file simply means
//! defaults; a malformed one is an error.

use crate::theme::Theme;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_fibonacci::{ConfigError, DEFAULT_DIMENSION, GameConfig, GameType};
use tracing::{debug, info, instrument};

/// Default location of the settings file.
pub const DEFAULT_SETTINGS_FILE: &str = "strictly_fibonacci.toml";

/// Player preferences and the best score so far.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Numbering variant of new games.
    game_type: GameType,

    /// Board dimension of new games.
    board_size: usize,

    /// Color theme.
    theme: Theme,

    /// Highest score reached on any board.
    best_score: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game_type: GameType::default(),
            board_size: DEFAULT_DIMENSION,
            theme: Theme::default(),
            best_score: 0,
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file, or defaults if it does not exist.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No settings file; using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::new(format!("Failed to read settings file: {}", e)))?;
        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::new(format!("Failed to parse settings: {}", e)))?;

        info!(
            game_type = %settings.game_type,
            board_size = settings.board_size,
            theme = %settings.theme,
            "Settings loaded"
        );
        Ok(settings)
    }

    /// Writes settings to a TOML file.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SettingsError::new(format!("Failed to serialize settings: {}", e)))?;
        std::fs::write(path.as_ref(), content)
            .map_err(|e| SettingsError::new(format!("Failed to write settings file: {}", e)))?;
        debug!(best_score = self.best_score, "Settings saved");
        Ok(())
    }

    /// Builds the game configuration these settings describe.
    pub fn game_config(&self) -> Result<GameConfig, ConfigError> {
        GameConfig::new(self.board_size, self.game_type)
    }

    /// Raises the best score if `score` beats it. Returns whether it did.
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Changes the variant of new games.
    pub fn set_game_type(&mut self, game_type: GameType) {
        self.game_type = game_type;
    }

    /// Changes the board size of new games.
    pub fn set_board_size(&mut self, board_size: usize) {
        self.board_size = board_size;
    }

    /// Changes the theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}

/// Settings store error.
#[derive(Debug, Clone, Display, Error)]
#[display("Settings error: {} at {}:{}", message, file, line)]
pub struct SettingsError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SettingsError {
    /// Creates a new settings error with caller location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
