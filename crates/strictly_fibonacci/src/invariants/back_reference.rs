//! Back-reference invariant: every tile names the cell that owns it.

use super::Invariant;
use crate::events::Presenter;
use crate::manager::GameManager;

/// Invariant: each tile's recorded cell is the cell holding it.
pub struct TilesKnowTheirCellInvariant;

impl<P: Presenter> Invariant<GameManager<P>> for TilesKnowTheirCellInvariant {
    fn holds(game: &GameManager<P>) -> bool {
        game.grid()
            .cells()
            .all(|cell| cell.tile().is_none_or(|tile| tile.cell() == cell.position()))
    }

    fn description() -> &'static str {
        "Every tile's back-reference names its owning cell"
    }
}
