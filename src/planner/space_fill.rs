// Space-filling strategy
//
// Path length to a common target is a cheap stand-in for how much room a first
// step leaves. Among the head's open neighbours the longest route wins.

use log::debug;
use rayon::prelude::*;

use super::query::{find_path, QueryOptions};
use crate::search::{Path, PathFinder};
use crate::snapshot::{Occupant, Snapshot};
use crate::types::Coord;

/// Returns `[head] ++ longest neighbour route` when it beats `baseline`,
/// otherwise `baseline` unchanged. Ties go to the earliest neighbour in
/// up/down/left/right order, with or without `parallel`.
pub fn space_fill<F: PathFinder + ?Sized>(
    finder: &F,
    board: &Snapshot,
    target: Coord,
    baseline: Option<Path>,
    prune_tip: bool,
    parallel: bool,
) -> Option<Path> {
    let head = board.agent().head();
    let neighbours = board.open_neighbours(head);
    let options = QueryOptions::with_prune_tip(prune_tip);

    // once the agent steps off its head, that cell is body
    let mut board = board.clone();
    board.set(head, Some(Occupant::Snake(board.agent_index())));
    let board = &board;

    let paths: Vec<Option<Path>> = if parallel {
        neighbours
            .par_iter()
            .map(|n| find_path(finder, board, *n, target, options))
            .collect()
    } else {
        neighbours
            .iter()
            .map(|n| find_path(finder, board, *n, target, options))
            .collect()
    };
    debug!("Space filling paths are: {:?}", paths);

    let mut longest: Option<Path> = None;
    for path in paths.into_iter().flatten() {
        if path.len() > longest.as_ref().map_or(0, |l| l.len()) {
            longest = Some(path);
        }
    }

    let baseline_len = baseline.as_ref().map_or(0, |p| p.len());
    match longest {
        Some(path) if path.len() > baseline_len => {
            let mut filled = Vec::with_capacity(path.len() + 1);
            filled.push(head);
            filled.extend(path);
            Some(filled)
        }
        _ => baseline,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::AStar;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn len(path: &Option<Path>) -> usize {
        path.as_ref().map_or(0, |p| p.len())
    }

    #[test]
    fn test_prefers_the_roomier_first_step() {
        // head at (1, 0); target (2, 0) is adjacent but stepping away first is longer
        let mut s = Snapshot::new(4, 3).unwrap();
        s.add_agent("me", vec![c(1, 0), c(1, 1)]).unwrap();

        let baseline = Some(vec![c(1, 0), c(2, 0)]);
        let result = space_fill(&AStar::default(), &s, c(2, 0), baseline, false, false).unwrap();

        // left, down the side, along the bottom and back up: never through the head
        assert_eq!(result.len(), 8);
        assert_eq!(result[0], c(1, 0));
        assert_eq!(result[1], c(0, 0));
        assert_eq!(result.iter().filter(|cell| **cell == c(1, 0)).count(), 1);
        assert_eq!(result.last(), Some(&c(2, 0)));
        for pair in result.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
    }

    #[test]
    fn test_never_shorter_than_baseline() {
        let mut s = Snapshot::new(5, 5).unwrap();
        s.add_agent("me", vec![c(2, 2), c(2, 3)]).unwrap();
        let finder = AStar::default();

        let long_baseline: Path = (0..5).map(|x| c(x, 4)).chain((0..5).map(|x| c(4 - x, 0))).collect();
        for baseline in [None, Some(vec![c(2, 2)]), Some(long_baseline)] {
            for target in [c(0, 0), c(4, 4), c(2, 0)] {
                let before = len(&baseline);
                let result = space_fill(&finder, &s, target, baseline.clone(), false, false);
                assert!(len(&result) >= before);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut s = Snapshot::new(6, 6).unwrap();
        s.add_agent("me", vec![c(2, 2), c(2, 3), c(3, 3)]).unwrap();
        s.set(c(1, 2), Some(Occupant::Wall));
        let finder = AStar::default();

        for target in [c(0, 0), c(5, 5), c(3, 0), c(0, 5)] {
            let seq = space_fill(&finder, &s, target, None, false, false);
            let par = space_fill(&finder, &s, target, None, false, true);
            assert_eq!(seq, par);
        }
    }

    #[test]
    fn test_equal_routes_go_to_earliest_neighbour() {
        // . . .
        // . H #    up and left both reach (0, 0) in two cells
        // . S .
        let mut s = Snapshot::new(3, 3).unwrap();
        s.add_agent("me", vec![c(1, 1), c(1, 2)]).unwrap();
        s.set(c(2, 1), Some(Occupant::Wall));

        for parallel in [false, true] {
            let result = space_fill(&AStar::default(), &s, c(0, 0), None, false, parallel);
            assert_eq!(result, Some(vec![c(1, 1), c(1, 0), c(0, 0)]));
        }
    }

    #[test]
    fn test_boxed_in_head_returns_baseline() {
        let mut s = Snapshot::new(3, 3).unwrap();
        s.add_agent("me", vec![c(1, 1), c(1, 2)]).unwrap();
        for cell in [c(1, 0), c(0, 1), c(2, 1)] {
            s.set(cell, Some(Occupant::Wall));
        }
        let baseline = Some(vec![c(1, 1)]);
        let result = space_fill(&AStar::default(), &s, c(0, 0), baseline.clone(), true, false);
        assert_eq!(result, baseline);
    }
}
