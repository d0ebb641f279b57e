// Cut-path strategy: give up tail cells until a route opens

use log::debug;

use super::query::{find_path, QueryOptions};
use super::truncation::TruncationLengths;
use crate::search::{Path, PathFinder};
use crate::snapshot::Snapshot;
use crate::types::Coord;

/// Result of a cut-path search
#[derive(Debug, Clone)]
pub struct CutPath {
    pub path: Option<Path>,
    /// Number of tail cells vacated for the final attempt
    pub cut_len: usize,
    /// Vacated cell nearest the head, if any were vacated
    pub endpoint: Option<Coord>,
    /// Private board with the tail vacated
    pub board: Snapshot,
}

impl CutPath {
    pub fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, |p| p.len())
    }

    /// True when the route is longer than the tail that was sacrificed for it
    pub fn worth_it(&self) -> bool {
        self.path_len() > self.cut_len
    }
}

/// Tries increasing truncation lengths until a real move towards `end`
/// exists, then replans to the freed tail cell.
pub fn cut_path<F: PathFinder + ?Sized>(
    finder: &F,
    snapshot: &Snapshot,
    start: Coord,
    end: Coord,
) -> CutPath {
    let mut board = snapshot.clone();
    let mut cut_len = 0;
    let mut endpoint = None;
    let mut path = None;

    for len in TruncationLengths::for_snake(snapshot.agent()) {
        cut_len = len;
        endpoint = board.vacate_agent_tail(len);
        path = find_path(finder, &board, start, end, QueryOptions::plain());
        debug!("Cut path at length {}: {:?}", len, path);

        let moves = path.as_ref().map_or(false, |p| p.len() > 1);
        if let (Some(tail_pt), true) = (endpoint, moves) {
            debug!("Returning cut path to end point {:?} at length {}", tail_pt, len);
            path = find_path(finder, &board, start, tail_pt, QueryOptions::plain());
            break;
        }
    }

    CutPath {
        path,
        cut_len,
        endpoint,
        board,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::AStar;
    use crate::snapshot::Occupant;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_open_board_still_cuts_one_cell() {
        // length 0 never has an endpoint, so the first success is at length 1
        let mut s = Snapshot::new(5, 5).unwrap();
        s.add_agent("me", vec![c(2, 2), c(2, 3), c(2, 4)]).unwrap();

        let cut = cut_path(&AStar::default(), &s, c(2, 2), c(2, 0));
        assert_eq!(cut.cut_len, 1);
        assert_eq!(cut.endpoint, Some(c(2, 4)));
        let path = cut.path.clone().unwrap();
        assert_eq!(path.first(), Some(&c(2, 2)));
        assert_eq!(path.last(), Some(&c(2, 4)));
        assert!(cut.board.is_vacant(c(2, 4)));
        assert!(!s.is_vacant(c(2, 4)), "canonical board must stay intact");
    }

    #[test]
    fn test_unreachable_target_exhausts_sequence() {
        let mut s = Snapshot::new(4, 4).unwrap();
        s.add_agent("me", vec![c(0, 0), c(1, 0), c(2, 0), c(3, 0)]).unwrap();
        for x in 0..4 {
            s.set(c(x, 2), Some(Occupant::Wall));
        }

        let cut = cut_path(&AStar::default(), &s, c(0, 0), c(0, 3));
        // tail of 3: lengths 0, 1, 2
        assert_eq!(cut.cut_len, 2);
        assert_eq!(cut.path, None);
        assert_eq!(cut.endpoint, Some(c(2, 0)));
        assert!(!cut.worth_it());
    }

    #[test]
    fn test_single_cell_snake_only_tries_zero() {
        let mut s = Snapshot::new(3, 3).unwrap();
        s.add_agent("me", vec![c(1, 1)]).unwrap();
        let cut = cut_path(&AStar::default(), &s, c(1, 1), c(0, 0));
        assert_eq!(cut.cut_len, 0);
        assert_eq!(cut.endpoint, None);
        assert_eq!(cut.path_len(), 3);
    }
}
