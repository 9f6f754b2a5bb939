//! Occupancy invariant: the board holds exactly the tiles the session counts.

use super::Invariant;
use crate::events::Presenter;
use crate::manager::GameManager;

/// Invariant: the number of occupied cells equals the session's live tile
/// count.
///
/// Spawns add one tile, each merge retires one (two for a three-way merge),
/// and a clear retires them all; any other change to the board is a bug.
pub struct OccupancyInvariant;

impl<P: Presenter> Invariant<GameManager<P>> for OccupancyInvariant {
    fn holds(game: &GameManager<P>) -> bool {
        game.grid().occupied_count() == game.live_tiles()
    }

    fn description() -> &'static str {
        "Occupied cells match the live tile count"
    }
}
