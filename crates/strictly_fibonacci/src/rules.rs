//! Merge rules for the three game variants.
//!
//! This module contains pure functions over tile levels. A level is an
//! abstract rank; what number a player sees on the tile is
//! [`RuleSet::value`] of that level. Rules are kept separate from grid
//! storage so move resolution can consult them without owning them.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// The level returned by merge functions when two levels cannot merge.
pub const NO_MERGE: u32 = 0;

/// Which numbering the game is played with.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum GameType {
    /// Classic 2048: equal tiles merge, values are powers of two.
    #[default]
    #[serde(rename = "power-of-2")]
    #[strum(to_string = "power-of-2")]
    PowerOf2,
    /// Three equal tiles in a row merge, values are powers of three.
    #[serde(rename = "power-of-3")]
    #[strum(to_string = "power-of-3")]
    PowerOf3,
    /// Neighbouring Fibonacci numbers merge.
    #[serde(rename = "fibonacci")]
    #[strum(to_string = "fibonacci")]
    Fibonacci,
}

/// Game rules for one game type on one board size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSet {
    game_type: GameType,
    dimension: usize,
}

impl RuleSet {
    /// Creates the rules for a game type played on a board of the given
    /// dimension.
    pub fn new(game_type: GameType, dimension: usize) -> Self {
        Self {
            game_type,
            dimension,
        }
    }

    /// Returns the game type.
    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Returns the board dimension these rules were built for.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether two levels can merge with each other. Commutative.
    pub fn is_mergeable(&self, level1: u32, level2: u32) -> bool {
        match self.game_type {
            GameType::Fibonacci => level1.abs_diff(level2) == 1,
            GameType::PowerOf2 | GameType::PowerOf3 => level1 == level2,
        }
    }

    /// The level produced by merging two levels, or [`NO_MERGE`] if they
    /// cannot merge.
    pub fn merge_result_level(&self, level1: u32, level2: u32) -> u32 {
        if !self.is_mergeable(level1, level2) {
            return NO_MERGE;
        }

        match self.game_type {
            GameType::Fibonacci => {
                if level1.checked_add(1) == Some(level2) {
                    level2.saturating_add(1)
                } else {
                    level1.saturating_add(1)
                }
            }
            GameType::PowerOf2 | GameType::PowerOf3 => level1.saturating_add(1),
        }
    }

    /// The level produced by merging three tiles in a row, or [`NO_MERGE`].
    ///
    /// Both neighbouring pairs must merge; the result is the smaller of the
    /// two pairwise results.
    pub fn merge_three_result_level(&self, near: u32, middle: u32, far: u32) -> u32 {
        self.merge_result_level(near, middle)
            .min(self.merge_result_level(middle, far))
    }

    /// The number displayed on a tile of the given level.
    ///
    /// Saturates at `u64::MAX` for levels no real game reaches.
    pub fn value(&self, level: u32) -> u64 {
        match self.game_type {
            GameType::Fibonacci => {
                let (mut a, mut b) = (1u64, 1u64);
                for _ in 0..level {
                    let c = a.saturating_add(b);
                    a = b;
                    b = c;
                }
                a
            }
            GameType::PowerOf2 => 2u64.saturating_pow(level),
            GameType::PowerOf3 => 3u64.saturating_pow(level),
        }
    }

    /// The level a tile must reach for the game to count as won.
    #[instrument]
    pub fn winning_level(&self) -> u32 {
        winning_level(self.dimension, self.game_type)
    }
}

/// The winning threshold for a board size and game type.
pub fn winning_level(dimension: usize, game_type: GameType) -> u32 {
    match game_type {
        GameType::PowerOf3 => match dimension {
            3 => 4,
            4 => 5,
            5 => 6,
            _ => 5,
        },
        GameType::PowerOf2 | GameType::Fibonacci => {
            let level = 11;
            match dimension {
                3 => level - 1,
                5 => level + 2,
                _ => level,
            }
        }
    }
}
