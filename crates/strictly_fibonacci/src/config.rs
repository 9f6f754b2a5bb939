//! Session configuration.

use crate::error::ConfigError;
use crate::rules::{GameType, RuleSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Board sizes the game supports.
pub const SUPPORTED_DIMENSIONS: [usize; 3] = [3, 4, 5];

/// Board size used when nothing else is configured.
pub const DEFAULT_DIMENSION: usize = 4;

/// The configuration a session is played with.
///
/// Supplied explicitly to every session start; the engine keeps no global
/// copy of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGameConfig")]
pub struct GameConfig {
    dimension: usize,
    game_type: GameType,
}

impl GameConfig {
    /// Creates a configuration, rejecting board sizes other than 3, 4 or 5.
    #[track_caller]
    #[instrument]
    pub fn new(dimension: usize, game_type: GameType) -> Result<Self, ConfigError> {
        if !SUPPORTED_DIMENSIONS.contains(&dimension) {
            return Err(ConfigError::new(format!(
                "Unsupported board dimension {} (expected one of {:?})",
                dimension, SUPPORTED_DIMENSIONS
            )));
        }
        debug!(dimension, %game_type, "Game config accepted");
        Ok(Self {
            dimension,
            game_type,
        })
    }

    /// Returns the board dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the game type.
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Returns the merge rules for this configuration.
    pub fn rules(&self) -> RuleSet {
        RuleSet::new(self.game_type, self.dimension)
    }

    /// Number of tiles spawned after each successful move.
    ///
    /// A 5 × 5 powers-of-two board fills too slowly with one, so it gets two.
    pub fn tiles_per_move(&self) -> usize {
        if self.dimension == 5 && self.game_type == GameType::PowerOf2 {
            2
        } else {
            1
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            dimension: DEFAULT_DIMENSION,
            game_type: GameType::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawGameConfig {
    dimension: usize,
    game_type: GameType,
}

impl TryFrom<RawGameConfig> for GameConfig {
    type Error = ConfigError;

    #[track_caller]
    fn try_from(raw: RawGameConfig) -> Result<Self, Self::Error> {
        Self::new(raw.dimension, raw.game_type)
    }
}
