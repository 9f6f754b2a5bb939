//! Board coordinates and move directions.

use derive_new::new;
use serde::{Deserialize, Serialize};

/// A cell coordinate on the board.
///
/// `x` is the row and `y` the column, both zero-indexed. Coordinates are
/// signed so that lookups one step past an edge are representable; the grid
/// answers those with "no cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Position {
    /// Row index.
    pub x: i32,
    /// Column index.
    pub y: i32,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Direction of a move, already resolved from whatever gesture or key
/// produced it.
///
/// `Up` and `Down` slide tiles along the row axis (`x`): `Up` towards the
/// last row, `Down` towards row 0. `Left` and `Right` slide along the column
/// axis (`y`): `Right` towards the last column, `Left` towards column 0.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    /// Towards the last row.
    Up,
    /// Towards column 0.
    Left,
    /// Towards row 0.
    Down,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    /// Whether moves in this direction scan the grid in reverse order.
    ///
    /// Tiles travelling towards higher indices must be resolved starting
    /// from the far end, so the nearest tile to the wall claims it first.
    pub fn is_reverse(self) -> bool {
        matches!(self, Direction::Up | Direction::Right)
    }

    /// Index step along the axis of travel: `+1` or `-1`.
    pub fn unit(self) -> i32 {
        if self.is_reverse() { 1 } else { -1 }
    }

    /// Whether the move travels along the row axis.
    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// The coordinate of `position` along the axis of travel.
    pub fn coordinate(self, position: Position) -> i32 {
        if self.is_vertical() {
            position.x
        } else {
            position.y
        }
    }

    /// The position on the same line as `position` whose coordinate along
    /// the axis of travel is `index`.
    pub fn along(self, position: Position, index: i32) -> Position {
        if self.is_vertical() {
            Position::new(index, position.y)
        } else {
            Position::new(position.x, index)
        }
    }

    /// Whether `index` is still on the board when walking in this
    /// direction on a board of the given dimension.
    pub fn in_travel_range(self, index: i32, dimension: usize) -> bool {
        if self.is_reverse() {
            index < dimension as i32
        } else {
            index > -1
        }
    }
}
