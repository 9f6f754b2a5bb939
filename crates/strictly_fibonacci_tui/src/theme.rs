//! Color themes for the board.
//!
//! Each theme has a fixed style table plus per-level tile and text colors
//! for levels 1 through 15. Higher levels reuse the level-15 entry.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Highest level with its own entry in the color tables.
pub const MAX_STYLED_LEVEL: u32 = 15;

/// An RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.0, rgb.1, rgb.2)
    }
}

const WHITE: Rgb = Rgb(255, 255, 255);

/// Colors of everything that is not a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeStyle {
    /// Screen background.
    pub background: Rgb,
    /// Board background, also used for empty cells.
    pub board: Rgb,
    /// Score panel background.
    pub score_board: Rgb,
    /// Accent for overlays and key hints.
    pub button: Rgb,
}

/// Selectable color theme.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Theme {
    /// Warm beige, the classic look.
    #[default]
    Default,
    /// Saturated reds and oranges.
    Vibrant,
    /// Pastels with colored digits.
    Joyful,
}

// ─────────────────────────────────────────────────────────────
//  Tables
// ─────────────────────────────────────────────────────────────

const DEFAULT_TILES: [Rgb; 15] = [
    Rgb(238, 228, 218),
    Rgb(237, 224, 200),
    Rgb(242, 177, 121),
    Rgb(245, 149, 99),
    Rgb(246, 124, 95),
    Rgb(246, 94, 59),
    Rgb(237, 207, 114),
    Rgb(237, 204, 97),
    Rgb(237, 200, 80),
    Rgb(237, 197, 63),
    Rgb(237, 194, 46),
    Rgb(173, 183, 119),
    Rgb(170, 183, 102),
    Rgb(164, 183, 79),
    Rgb(161, 183, 63),
];

const VIBRANT_TILES: [Rgb; 15] = [
    Rgb(254, 223, 180),
    Rgb(254, 183, 143),
    Rgb(253, 187, 45),
    Rgb(253, 157, 40),
    Rgb(246, 124, 95),
    Rgb(217, 70, 119),
    Rgb(210, 65, 97),
    Rgb(207, 50, 90),
    Rgb(205, 35, 84),
    Rgb(200, 30, 78),
    Rgb(190, 20, 70),
    Rgb(254, 233, 78),
    Rgb(249, 191, 64),
    Rgb(247, 167, 56),
    Rgb(244, 138, 48),
];

const JOYFUL_TILES: [Rgb; 15] = [
    Rgb(236, 243, 251),
    Rgb(230, 245, 252),
    Rgb(95, 131, 157),
    Rgb(164, 232, 254),
    Rgb(226, 246, 209),
    Rgb(237, 228, 253),
    Rgb(254, 224, 235),
    Rgb(254, 235, 115),
    Rgb(255, 249, 136),
    Rgb(208, 246, 247),
    Rgb(251, 244, 236),
    Rgb(254, 237, 229),
    Rgb(205, 247, 235),
    Rgb(57, 120, 104),
    Rgb(93, 125, 62),
];

const JOYFUL_TEXT: [Rgb; 15] = [
    Rgb(104, 119, 131),
    Rgb(70, 128, 161),
    WHITE,
    Rgb(64, 173, 246),
    Rgb(97, 159, 42),
    Rgb(124, 85, 201),
    Rgb(223, 73, 115),
    Rgb(244, 111, 41),
    Rgb(253, 160, 46),
    Rgb(30, 160, 158),
    Rgb(147, 129, 115),
    Rgb(162, 93, 60),
    Rgb(68, 227, 184),
    WHITE,
    WHITE,
];

/// Maps a level onto a 0-based table index, clamping into 1..=15.
fn table_index(level: u32) -> usize {
    (level.clamp(1, MAX_STYLED_LEVEL) - 1) as usize
}

impl Theme {
    /// Returns the non-tile colors.
    pub fn style(self) -> ThemeStyle {
        match self {
            Self::Default => ThemeStyle {
                background: Rgb(250, 248, 239),
                board: Rgb(204, 192, 179),
                score_board: Rgb(187, 173, 160),
                button: Rgb(119, 110, 101),
            },
            Self::Vibrant => ThemeStyle {
                background: Rgb(240, 240, 240),
                board: Rgb(240, 240, 240),
                score_board: Rgb(253, 144, 38),
                button: Rgb(205, 35, 85),
            },
            Self::Joyful => ThemeStyle {
                background: Rgb(255, 254, 237),
                board: Rgb(255, 254, 237),
                score_board: Rgb(243, 168, 40),
                button: Rgb(242, 79, 46),
            },
        }
    }

    /// Background color of a tile at `level`.
    pub fn tile_color(self, level: u32) -> Rgb {
        let index = table_index(level);
        match self {
            Self::Default => DEFAULT_TILES[index],
            Self::Vibrant => VIBRANT_TILES[index],
            Self::Joyful => JOYFUL_TILES[index],
        }
    }

    /// Digit color of a tile at `level`.
    pub fn text_color(self, level: u32) -> Rgb {
        let index = table_index(level);
        match self {
            Self::Default if index < 2 => Rgb(118, 109, 100),
            Self::Vibrant if index < 2 => Rgb(150, 110, 90),
            Self::Default | Self::Vibrant => WHITE,
            Self::Joyful => JOYFUL_TEXT[index],
        }
    }
}
