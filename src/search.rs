// Shortest-path search over a snapshot
//
// The planner only depends on the `PathFinder` trait; `AStar` is the finder the
// server runs with.

use log::debug;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::snapshot::Snapshot;
use crate::types::{Coord, Direction};

/// Ordered cells from start to end, both inclusive
pub type Path = Vec<Coord>;

/// Finds a shortest occupancy-respecting route between two cells.
///
/// The start cell may be occupied (it is usually the agent's head); every other
/// cell on the route, including the end, must be vacant. `None` means the end
/// cannot be reached.
pub trait PathFinder: Sync {
    fn shortest_path(&self, snapshot: &Snapshot, start: Coord, end: Coord) -> Option<Path>;
}

/// Four-way A* with a Manhattan heuristic
#[derive(Debug, Clone)]
pub struct AStar {
    max_expansions: usize,
}

impl AStar {
    pub fn new(max_expansions: usize) -> Self {
        AStar { max_expansions }
    }
}

impl Default for AStar {
    fn default() -> Self {
        AStar::new(usize::MAX)
    }
}

impl PathFinder for AStar {
    /// Searches from `end` back towards `start` so that following parent links
    /// from `start` yields the route already in travel order.
    fn shortest_path(&self, snapshot: &Snapshot, start: Coord, end: Coord) -> Option<Path> {
        if !snapshot.in_bounds(start) || !snapshot.in_bounds(end) {
            return None;
        }
        if start == end {
            return Some(vec![start]);
        }
        if !snapshot.is_vacant(end) {
            return None;
        }

        let width = snapshot.width();
        let size = snapshot.cell_count();
        let idx = |c: Coord| (c.y * width + c.x) as usize;
        let cell_at = |i: usize| Coord::new(i as i32 % width, i as i32 / width);

        let mut best_cost: Vec<Option<u32>> = vec![None; size];
        let mut parent: Vec<Option<usize>> = vec![None; size];
        let mut closed = vec![false; size];

        // (f, g, insertion order) keeps the search deterministic
        let mut open: BinaryHeap<(Reverse<(u32, u32, u64)>, usize)> = BinaryHeap::new();
        let mut seq: u64 = 0;

        best_cost[idx(end)] = Some(0);
        open.push((Reverse((end.distance(&start) as u32, 0, seq)), idx(end)));

        let mut expansions = 0usize;
        while let Some((Reverse((_, g, _)), node)) = open.pop() {
            if closed[node] {
                continue;
            }
            closed[node] = true;

            let cell = cell_at(node);
            if cell == start {
                let mut path = vec![start];
                let mut cursor = parent[node];
                while let Some(p) = cursor {
                    path.push(cell_at(p));
                    cursor = parent[p];
                }
                return Some(path);
            }

            expansions += 1;
            if expansions > self.max_expansions {
                debug!(
                    "A* gave up after {} expansions ({:?} -> {:?})",
                    self.max_expansions, start, end
                );
                return None;
            }

            for dir in Direction::all() {
                let next = dir.apply(&cell);
                if !snapshot.in_bounds(next) {
                    continue;
                }
                let next_idx = idx(next);
                if closed[next_idx] || (next != start && !snapshot.is_vacant(next)) {
                    continue;
                }

                let cost = g + 1;
                if best_cost[next_idx].map_or(true, |known| cost < known) {
                    best_cost[next_idx] = Some(cost);
                    parent[next_idx] = Some(node);
                    seq += 1;
                    let f = cost + next.distance(&start) as u32;
                    open.push((Reverse((f, cost, seq)), next_idx));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Occupant;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    fn empty(width: i32, height: i32) -> Snapshot {
        let mut s = Snapshot::new(width, height).unwrap();
        s.add_agent("me", vec![c(0, 0)]).unwrap();
        s
    }

    #[test]
    fn test_straight_line_path_includes_both_ends() {
        let s = empty(5, 5);
        let path = AStar::default().shortest_path(&s, c(2, 2), c(2, 0)).unwrap();
        assert_eq!(path, vec![c(2, 2), c(2, 1), c(2, 0)]);
    }

    #[test]
    fn test_same_cell_is_single_cell_path() {
        let s = empty(3, 3);
        assert_eq!(AStar::default().shortest_path(&s, c(1, 1), c(1, 1)), Some(vec![c(1, 1)]));
    }

    #[test]
    fn test_occupied_end_is_unreachable() {
        let mut s = empty(3, 3);
        s.set(c(2, 2), Some(Occupant::Wall));
        assert_eq!(AStar::default().shortest_path(&s, c(0, 0), c(2, 2)), None);
    }

    #[test]
    fn test_occupied_start_is_allowed() {
        let mut s = empty(3, 3);
        s.set(c(1, 1), Some(Occupant::Wall));
        let path = AStar::default().shortest_path(&s, c(1, 1), c(1, 0)).unwrap();
        assert_eq!(path, vec![c(1, 1), c(1, 0)]);
    }

    #[test]
    fn test_routes_around_walls() {
        // .....
        // ###.#
        // .....
        let mut s = empty(5, 3);
        for x in [0, 1, 2, 4] {
            s.set(c(x, 1), Some(Occupant::Wall));
        }
        let path = AStar::default().shortest_path(&s, c(0, 0), c(0, 2)).unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path.first(), Some(&c(0, 0)));
        assert_eq!(path.last(), Some(&c(0, 2)));
        assert!(path.contains(&c(3, 1)));
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance(&pair[1]), 1);
        }
    }

    #[test]
    fn test_walled_off_target_is_none() {
        let mut s = empty(3, 3);
        s.set(c(1, 0), Some(Occupant::Wall));
        s.set(c(1, 1), Some(Occupant::Wall));
        s.set(c(1, 2), Some(Occupant::Wall));
        assert_eq!(AStar::default().shortest_path(&s, c(0, 0), c(2, 2)), None);
    }

    #[test]
    fn test_expansion_cap_gives_up() {
        let s = empty(10, 10);
        assert_eq!(AStar::new(2).shortest_path(&s, c(0, 0), c(9, 9)), None);
        assert!(AStar::new(1000).shortest_path(&s, c(0, 0), c(9, 9)).is_some());
    }

    #[test]
    fn test_out_of_bounds_is_none() {
        let s = empty(3, 3);
        assert_eq!(AStar::default().shortest_path(&s, c(0, 0), c(5, 5)), None);
    }
}
