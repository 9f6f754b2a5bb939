//! Board bookkeeping checks for game sessions.
//!
//! Each check is a type implementing [`Invariant`]; tuples of them form an
//! [`InvariantSet`]. The manager runs [`SessionInvariants`] after every
//! committed move in debug builds.

/// A property of a session that every committed move must preserve.
pub trait Invariant<S> {
    /// Whether the property holds for `state`.
    fn holds(state: &S) -> bool;

    /// What the property promises, for reports.
    fn description() -> &'static str;
}

/// A failed [`Invariant`], by description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the property that failed.
    pub description: String,
}

impl InvariantViolation {
    /// Wraps a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariants checked together; implemented for tuples of up to four.
pub trait InvariantSet<S> {
    /// Checks every member and collects the ones that fail.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($member:ident),+) => {
        impl<S, $($member),+> InvariantSet<S> for ($($member,)+)
        where
            $($member: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let violations: Vec<InvariantViolation> = [
                    $(($member::holds(state), $member::description()),)+
                ]
                .into_iter()
                .filter(|(holds, _)| !holds)
                .map(|(_, description)| InvariantViolation::new(description))
                .collect();

                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(A);
impl_invariant_set!(A, B);
impl_invariant_set!(A, B, C);
impl_invariant_set!(A, B, C, D);

pub mod back_reference;
pub mod occupancy;
pub mod settled;

pub use back_reference::TilesKnowTheirCellInvariant;
pub use occupancy::OccupancyInvariant;
pub use settled::SettledTilesInvariant;

/// All session invariants as a composable set.
pub type SessionInvariants = (
    OccupancyInvariant,
    TilesKnowTheirCellInvariant,
    SettledTilesInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, EventLog, GameConfig, GameManager, GameType, Grid};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn idle_manager() -> GameManager<EventLog> {
        let grid = Grid::from_levels(&[[1, 1, 0], [0, 2, 0], [0, 0, 0]]).unwrap();
        let config = GameConfig::new(3, GameType::PowerOf2).unwrap();
        GameManager::from_grid(config, grid, EventLog::new(), StdRng::seed_from_u64(5)).unwrap()
    }

    #[test]
    fn test_invariant_set_holds_for_fresh_session() {
        let mut game = GameManager::with_rng(
            GameConfig::default(),
            EventLog::new(),
            StdRng::seed_from_u64(11),
        );
        game.start_new_session(GameConfig::default());
        game.on_cleared();
        assert!(SessionInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut game = idle_manager();
        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            game.move_to(direction);
            assert!(SessionInvariants::check_all(&game).is_ok());
        }
    }

    #[test]
    fn test_two_invariants_as_set() {
        let game = idle_manager();
        type TwoInvariants = (OccupancyInvariant, SettledTilesInvariant);
        assert!(TwoInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_set_collects_every_failure() {
        struct Never;
        impl Invariant<u8> for Never {
            fn holds(_: &u8) -> bool {
                false
            }
            fn description() -> &'static str {
                "never holds"
            }
        }
        struct Always;
        impl Invariant<u8> for Always {
            fn holds(_: &u8) -> bool {
                true
            }
            fn description() -> &'static str {
                "always holds"
            }
        }

        let violations = <(Never, Always, Never)>::check_all(&0).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.description == "never holds"));
        assert!(<(Always,)>::check_all(&0).is_ok());
    }

    #[test]
    fn test_violation_reports_description() {
        let violation = InvariantViolation::new(<OccupancyInvariant as Invariant<GameManager<EventLog>>>::description());
        assert!(violation.description.contains("live tile"));
    }
}
