// Turn planner: escalates through progressively riskier routing strategies
//
// 1. Disjoint route to the nearest food with a certified way back
// 2. Cut path to the food, sacrificing tail cells
// 3. Space filling towards the freed tail cell
// 4. Cut path to our own tip, then space filling towards it
// 5. Whatever the disjoint strategy produced, certified or not

pub mod cut_path;
pub mod disjoint;
pub mod moves;
pub mod query;
pub mod space_fill;
pub mod truncation;

use log::{debug, info};
use std::fmt;

use crate::config::SearchConfig;
use crate::search::{AStar, Path, PathFinder};
use crate::snapshot::Snapshot;
use crate::types::{Coord, Direction};

use cut_path::{cut_path, CutPath};
use disjoint::{disjoint_path, DisjointPath};
use space_fill::space_fill;

/// Why a turn could not be planned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// No food on the board to aim for
    NoTarget,
    /// The chosen path has no second cell to step onto
    NoMove,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::NoTarget => write!(f, "no food to target"),
            PlanError::NoMove => write!(f, "chosen path has no next step"),
        }
    }
}

impl std::error::Error for PlanError {}

/// The escalation step that produced the final path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rung {
    Disjoint,
    CutToFood,
    SpaceFillToFood,
    SpaceFillToTip,
    Uncertified,
}

impl Rung {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rung::Disjoint => "disjoint",
            Rung::CutToFood => "cut_to_food",
            Rung::SpaceFillToFood => "space_fill_to_food",
            Rung::SpaceFillToTip => "space_fill_to_tip",
            Rung::Uncertified => "uncertified",
        }
    }
}

impl fmt::Display for Rung {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final path for a turn and where it came from
#[derive(Debug, Clone)]
pub struct Plan {
    pub target: Coord,
    pub rung: Rung,
    pub path: Option<Path>,
}

/// A planned move
#[derive(Debug, Clone)]
pub struct Decision {
    pub direction: Direction,
    pub rung: Rung,
    pub path: Path,
}

enum Outcome {
    Selected(Path),
    TryNext,
}

/// Working state shared by the rungs of one turn
struct Turn<'a> {
    snapshot: &'a Snapshot,
    food: Coord,
    disjoint: Option<DisjointPath>,
    food_cut: Option<CutPath>,
}

type RungFn<F> = fn(&Planner<F>, &mut Turn) -> Outcome;

/// Stateless per-turn planner
#[derive(Debug, Clone)]
pub struct Planner<F: PathFinder = AStar> {
    finder: F,
    parallel_space_fill: bool,
}

impl Planner<AStar> {
    pub fn from_config(config: &SearchConfig) -> Self {
        Planner::new(AStar::new(config.max_expansions), config.parallel_space_fill)
    }
}

impl<F: PathFinder> Planner<F> {
    pub fn new(finder: F, parallel_space_fill: bool) -> Self {
        Planner {
            finder,
            parallel_space_fill,
        }
    }

    /// Picks this turn's move
    pub fn next_move(&self, snapshot: &Snapshot) -> Result<Decision, PlanError> {
        let plan = self.plan_turn(snapshot)?;
        let head = snapshot.agent().head();
        let direction = moves::first_step(head, plan.path.as_ref())?;

        info!(
            "Moving {} via {} path towards {:?}",
            direction.as_str(),
            plan.rung,
            plan.target
        );
        debug!("Following path: {:?}", plan.path);

        Ok(Decision {
            direction,
            rung: plan.rung,
            path: plan.path.unwrap_or_default(),
        })
    }

    /// Runs the escalation chain and returns the committed path
    pub fn plan_turn(&self, snapshot: &Snapshot) -> Result<Plan, PlanError> {
        let food = nearest_food(snapshot).ok_or(PlanError::NoTarget)?;
        let mut turn = Turn {
            snapshot,
            food,
            disjoint: None,
            food_cut: None,
        };

        let rungs: [(Rung, RungFn<F>); 4] = [
            (Rung::Disjoint, Self::try_disjoint),
            (Rung::CutToFood, Self::try_cut_to_food),
            (Rung::SpaceFillToFood, Self::try_space_fill_to_food),
            (Rung::SpaceFillToTip, Self::try_space_fill_to_tip),
        ];

        for (rung, attempt) in rungs {
            match attempt(self, &mut turn) {
                Outcome::Selected(path) => {
                    info!("Using {} path", rung);
                    return Ok(Plan {
                        target: food,
                        rung,
                        path: Some(path),
                    });
                }
                Outcome::TryNext => debug!("Not using {} path", rung),
            }
        }

        info!("Using {} path", Rung::Uncertified);
        Ok(Plan {
            target: food,
            rung: Rung::Uncertified,
            path: turn.disjoint.and_then(|d| d.path),
        })
    }

    fn try_disjoint(&self, turn: &mut Turn) -> Outcome {
        let mut board = turn.snapshot.clone();
        let result = disjoint_path(&self.finder, &mut board, turn.food);
        let outcome = match (&result.path, result.return_exists) {
            (Some(path), true) => Outcome::Selected(path.clone()),
            _ => Outcome::TryNext,
        };
        turn.disjoint = Some(result);
        outcome
    }

    fn try_cut_to_food(&self, turn: &mut Turn) -> Outcome {
        let head = turn.snapshot.agent().head();
        let cut = cut_path(&self.finder, turn.snapshot, head, turn.food);
        let outcome = match (&cut.path, cut.worth_it()) {
            (Some(path), true) => Outcome::Selected(path.clone()),
            _ => Outcome::TryNext,
        };
        turn.food_cut = Some(cut);
        outcome
    }

    fn try_space_fill_to_food(&self, turn: &mut Turn) -> Outcome {
        match turn.food_cut.take() {
            Some(cut) => self.fill_towards_cut(cut, false),
            None => Outcome::TryNext,
        }
    }

    fn try_space_fill_to_tip(&self, turn: &mut Turn) -> Outcome {
        let agent = turn.snapshot.agent();
        let cut = cut_path(&self.finder, turn.snapshot, agent.head(), agent.tip());
        self.fill_towards_cut(cut, true)
    }

    /// Space-fills towards the cell a cut path freed, on the cut's own board
    fn fill_towards_cut(&self, cut: CutPath, prune_tip: bool) -> Outcome {
        let endpoint = match cut.endpoint {
            Some(endpoint) => endpoint,
            None => return Outcome::TryNext,
        };

        let filled = space_fill(
            &self.finder,
            &cut.board,
            endpoint,
            cut.path,
            prune_tip,
            self.parallel_space_fill,
        );
        match filled {
            Some(path) if path.len() > cut.cut_len => Outcome::Selected(path),
            _ => Outcome::TryNext,
        }
    }
}

/// Closest food by Manhattan distance; ties go to the lowest (column, row)
pub fn nearest_food(snapshot: &Snapshot) -> Option<Coord> {
    let head = snapshot.agent().head();
    snapshot
        .food()
        .iter()
        .copied()
        .min_by_key(|f| (snapshot.distance(head, *f), *f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Occupant;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn planner() -> Planner {
        Planner::new(AStar::default(), false)
    }

    #[test]
    fn test_nearest_food_ties_are_lexicographic() {
        let mut s = Snapshot::new(5, 5).unwrap();
        s.add_agent("me", vec![c(2, 2)]).unwrap();
        s.add_food(c(4, 2)).unwrap();
        s.add_food(c(2, 4)).unwrap();
        s.add_food(c(2, 0)).unwrap();
        assert_eq!(nearest_food(&s), Some(c(2, 0)));

        s.add_food(c(1, 2)).unwrap();
        assert_eq!(nearest_food(&s), Some(c(1, 2)));
    }

    #[test]
    fn test_no_food_is_no_target() {
        let mut s = Snapshot::new(5, 5).unwrap();
        s.add_agent("me", vec![c(2, 2), c(2, 3)]).unwrap();
        assert_eq!(planner().next_move(&s).unwrap_err(), PlanError::NoTarget);
    }

    #[test]
    fn test_open_board_uses_disjoint_rung() {
        let mut s = Snapshot::new(5, 5).unwrap();
        s.add_agent("me", vec![c(2, 2), c(2, 3), c(2, 4)]).unwrap();
        s.add_food(c(2, 0)).unwrap();

        let decision = planner().next_move(&s).unwrap();
        assert_eq!(decision.rung, Rung::Disjoint);
        assert_eq!(decision.direction, Direction::Up);
        assert_eq!(decision.path, vec![c(2, 2), c(2, 1), c(2, 0)]);
    }

    #[test]
    fn test_canonical_snapshot_is_not_mutated() {
        let mut s = Snapshot::new(6, 3).unwrap();
        for x in 0..6 {
            s.set(c(x, 0), Some(Occupant::Wall));
        }
        for cell in [c(3, 2), c(4, 2), c(5, 2), c(4, 1), c(5, 1)] {
            s.set(cell, Some(Occupant::Wall));
        }
        s.add_agent("me", vec![c(1, 1), c(1, 2), c(0, 2), c(0, 1)]).unwrap();
        s.add_food(c(3, 1)).unwrap();
        let before = s.render();

        let _ = planner().plan_turn(&s);
        assert_eq!(s.render(), before);
        assert!(s.is_vacant(c(2, 1)));
    }

    #[test]
    fn test_rung_names() {
        assert_eq!(Rung::Disjoint.to_string(), "disjoint");
        assert_eq!(Rung::SpaceFillToTip.as_str(), "space_fill_to_tip");
    }
}
