//! Helpers shared by the integration tests.

use std::collections::HashMap;
use strictly_fibonacci::{GameEvent, Position};

/// Rebuilds a board from its starting levels and a stream of tile reports.
///
/// Applies every report in order to a map of occupied cells, the way a
/// renderer tracking sprites by cell would, and returns the result in the
/// same shape as `Grid::levels`.
pub fn replay(start: &[Vec<u32>], events: &[GameEvent]) -> Vec<Vec<u32>> {
    let dimension = start.len();
    let mut cells: HashMap<Position, u32> = HashMap::new();
    for (x, row) in start.iter().enumerate() {
        for (y, &level) in row.iter().enumerate() {
            if level != 0 {
                cells.insert(Position::new(x as i32, y as i32), level);
            }
        }
    }
    for event in events {
        match *event {
            GameEvent::ClearBegun => cells.clear(),
            GameEvent::TileInserted { position, level } => {
                cells.insert(position, level);
            }
            GameEvent::TileMoved { from, to, level } => {
                cells.remove(&from);
                cells.insert(to, level);
            }
            GameEvent::TileRemoved { position } => {
                cells.remove(&position);
            }
            GameEvent::TileLevelChanged { position, level } => {
                cells.insert(position, level);
            }
            GameEvent::ScoreChanged { .. } | GameEvent::GameWon | GameEvent::GameOver => {}
        }
    }

    (0..dimension)
        .map(|x| {
            (0..dimension)
                .map(|y| {
                    let position = Position::new(x as i32, y as i32);
                    cells.get(&position).copied().unwrap_or(0)
                })
                .collect()
        })
        .collect()
}
