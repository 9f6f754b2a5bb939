//! The board: a square of cells, each owning at most one tile.

use crate::error::ConfigError;
use crate::position::Position;
use crate::rules::GameType;
use crate::tile::{Tile, TileId};
use rand::Rng;
use tracing::{debug, instrument};

/// One addressable slot of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    position: Position,
    tile: Option<Tile>,
}

impl Cell {
    fn new(position: Position) -> Self {
        Self {
            position,
            tile: None,
        }
    }

    /// Returns the cell's position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the tile in this cell, if any.
    pub fn tile(&self) -> Option<&Tile> {
        self.tile.as_ref()
    }

    /// Whether the cell holds no tile.
    pub fn is_empty(&self) -> bool {
        self.tile.is_none()
    }
}

/// Iterator over every position of a grid in scan order.
///
/// Row-major; in reverse order both row and column run from the last index
/// down to 0. Holds only the dimension, so it can be cloned to restart and
/// does not borrow the grid it came from.
#[derive(Debug, Clone)]
pub struct Positions {
    dimension: usize,
    reverse: bool,
    next: usize,
}

impl Iterator for Positions {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let total = self.dimension * self.dimension;
        if self.next >= total {
            return None;
        }
        let step = if self.reverse {
            total - 1 - self.next
        } else {
            self.next
        };
        self.next += 1;
        Some(Position::new(
            (step / self.dimension) as i32,
            (step % self.dimension) as i32,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.dimension * self.dimension - self.next.min(self.dimension * self.dimension);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Positions {}

/// A `dimension × dimension` board of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    dimension: usize,
    /// Row-major: the cell at `(x, y)` is `cells[x * dimension + y]`.
    cells: Vec<Cell>,
    next_tile_id: u64,
    /// Sequence number for the next queued tile action.
    next_seq: u64,
}

impl Grid {
    /// Creates an empty grid. Callers pass a validated dimension.
    #[instrument]
    pub(crate) fn new(dimension: usize) -> Self {
        let cells = Positions {
            dimension,
            reverse: false,
            next: 0,
        }
        .map(Cell::new)
        .collect();
        Self {
            dimension,
            cells,
            next_tile_id: 0,
            next_seq: 0,
        }
    }

    /// Builds a grid from a square table of levels, `0` meaning empty.
    ///
    /// `rows[x][y]` becomes the tile at `Position { x, y }`.
    #[track_caller]
    #[instrument(skip(rows))]
    pub fn from_levels<R: AsRef<[u32]>>(rows: &[R]) -> Result<Self, ConfigError> {
        let dimension = rows.len();
        if !crate::config::SUPPORTED_DIMENSIONS.contains(&dimension) {
            return Err(ConfigError::new(format!(
                "Level table has {} rows (expected 3, 4 or 5)",
                dimension
            )));
        }

        let mut grid = Self::new(dimension);
        for (x, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != dimension {
                return Err(ConfigError::new(format!(
                    "Row {} has {} levels (expected {})",
                    x,
                    row.len(),
                    dimension
                )));
            }
            for (y, &level) in row.iter().enumerate() {
                if level > 0 {
                    grid.spawn_tile(Position::new(x as i32, y as i32), level);
                }
            }
        }
        Ok(grid)
    }

    /// Returns the dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Iterates every position in scan order.
    pub fn positions(&self, reverse: bool) -> Positions {
        Positions {
            dimension: self.dimension,
            reverse,
            next: 0,
        }
    }

    /// Calls `visit` with every position in scan order.
    pub fn for_each(&self, visit: impl FnMut(Position), reverse: bool) {
        self.positions(reverse).for_each(visit);
    }

    fn index(&self, position: Position) -> Option<usize> {
        let dimension = self.dimension as i32;
        if position.x < 0 || position.y < 0 || position.x >= dimension || position.y >= dimension {
            return None;
        }
        Some((position.x * dimension + position.y) as usize)
    }

    /// Returns the cell at `position`, or `None` off the board.
    pub fn cell_at(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|i| &self.cells[i])
    }

    /// Returns the tile at `position`, or `None` if off the board or empty.
    pub fn tile_at(&self, position: Position) -> Option<&Tile> {
        self.cell_at(position).and_then(Cell::tile)
    }

    pub(crate) fn tile_at_mut(&mut self, position: Position) -> Option<&mut Tile> {
        let index = self.index(position)?;
        self.cells[index].tile.as_mut()
    }

    /// Iterates all cells in forward scan order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Iterates all tiles in forward scan order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(Cell::tile)
    }

    /// Returns all empty cells in forward scan order.
    pub fn available_cells(&self) -> Vec<&Cell> {
        self.cells.iter().filter(|cell| cell.is_empty()).collect()
    }

    /// Whether at least one cell is empty.
    pub fn has_available_cells(&self) -> bool {
        self.cells.iter().any(Cell::is_empty)
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| !cell.is_empty()).count()
    }

    /// Picks an empty cell uniformly at random.
    pub fn random_available_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Cell> {
        let available = self.available_cells();
        if available.is_empty() {
            return None;
        }
        Some(available[rng.random_range(0..available.len())])
    }

    /// Spawns a tile with a random starting level in a random empty cell.
    ///
    /// Returns `None` without touching the grid when no cell is empty.
    #[instrument(skip(self, rng))]
    pub fn insert_random_tile<R: Rng + ?Sized>(
        &mut self,
        game_type: GameType,
        rng: &mut R,
    ) -> Option<&Tile> {
        let Some(position) = self.random_available_cell(rng).map(Cell::position) else {
            debug!("No available cell for a new tile");
            return None;
        };
        let level = Tile::spawn_level(game_type, rng);
        self.spawn_tile(position, level)
    }

    /// Places a new tile of `level` at `position`.
    ///
    /// Returns `None` if the position is off the board or already occupied.
    #[instrument(skip(self))]
    pub fn spawn_tile(&mut self, position: Position, level: u32) -> Option<&Tile> {
        let index = self.index(position)?;
        if self.cells[index].tile.is_some() {
            debug!(%position, "Cell already occupied");
            return None;
        }
        let id = TileId(self.next_tile_id);
        self.next_tile_id += 1;
        debug!(%position, level, tile = %id, "Spawning tile");
        self.cells[index].tile = Some(Tile::new(id, level, position));
        self.cells[index].tile.as_ref()
    }

    /// Hands out the next action sequence number.
    pub(crate) fn stamp(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Detaches the tile at `position`, if any.
    pub(crate) fn take_tile(&mut self, position: Position) -> Option<Tile> {
        let index = self.index(position)?;
        self.cells[index].tile.take()
    }

    /// Moves the tile at `from` into the empty cell at `to`.
    ///
    /// Returns whether a tile moved. Does nothing if `from` is empty, `to`
    /// is occupied, or either position is off the board.
    pub(crate) fn relocate(&mut self, from: Position, to: Position) -> bool {
        let (Some(from_index), Some(to_index)) = (self.index(from), self.index(to)) else {
            return false;
        };
        if self.cells[to_index].tile.is_some() {
            debug!(%from, %to, "Target cell occupied");
            return false;
        }
        let Some(mut tile) = self.cells[from_index].tile.take() else {
            return false;
        };
        let seq = self.stamp();
        tile.queue_move(to, seq);
        self.cells[to_index].tile = Some(tile);
        true
    }

    /// Detaches every tile, returning them in forward scan order.
    #[instrument(skip(self))]
    pub fn remove_all_tiles(&mut self) -> Vec<Tile> {
        let removed: Vec<Tile> = self
            .cells
            .iter_mut()
            .filter_map(|cell| cell.tile.take())
            .collect();
        debug!(count = removed.len(), "Removed all tiles");
        removed
    }

    /// Returns the level table, `0` for empty cells.
    pub fn levels(&self) -> Vec<Vec<u32>> {
        self.cells
            .chunks(self.dimension)
            .map(|row| {
                row.iter()
                    .map(|cell| cell.tile().map_or(0, Tile::level))
                    .collect()
            })
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (x, row) in self.levels().iter().enumerate() {
            if x > 0 {
                writeln!(f)?;
            }
            let line: Vec<String> = row
                .iter()
                .map(|&level| {
                    if level == 0 {
                        format!("{:>3}", ".")
                    } else {
                        format!("{:>3}", level)
                    }
                })
                .collect();
            write!(f, "{}", line.join(""))?;
        }
        Ok(())
    }
}
