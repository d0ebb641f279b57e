// Disjoint-path strategy: reach the target and keep a separate way back

use log::debug;
use std::collections::HashSet;

use super::query::{find_path, QueryOptions};
use crate::search::{Path, PathFinder};
use crate::snapshot::{Occupant, Snapshot};
use crate::types::Coord;

#[derive(Debug, Clone)]
pub struct DisjointPath {
    pub path: Option<Path>,
    /// A route from the target back to the tail tip existed before any cells
    /// were blocked
    pub return_exists: bool,
}

impl DisjointPath {
    pub fn is_certified(&self) -> bool {
        self.path.is_some() && self.return_exists
    }
}

/// Plans head -> target so it shares no cells with target -> tip.
///
/// Mutates `board`: cells shared by both legs (other than the target) are
/// marked as agent body. Pass a disposable copy.
pub fn disjoint_path<F: PathFinder + ?Sized>(
    finder: &F,
    board: &mut Snapshot,
    target: Coord,
) -> DisjointPath {
    let agent = board.agent_index();
    let head = board.agent().head();
    let tip = board.agent().tip();

    let path_init = find_path(finder, board, head, target, QueryOptions::plain());
    debug!("Init path: {:?}", path_init);

    let path_return = find_path(finder, board, target, tip, QueryOptions::trim_tip());
    debug!("Return path: {:?}", path_return);

    if let (Some(init), Some(ret)) = (&path_init, &path_return) {
        let forward: HashSet<Coord> = init.iter().copied().collect();
        let shared: Vec<Coord> = ret
            .iter()
            .copied()
            .filter(|c| *c != target && forward.contains(c))
            .collect();
        debug!("Removing intersections: {:?}", shared);
        for cell in shared {
            board.set(cell, Some(Occupant::Snake(agent)));
        }
    }

    let disjoint = find_path(finder, board, head, target, QueryOptions::plain());
    debug!("Disjoint path: {:?}", disjoint);

    DisjointPath {
        path: disjoint.or(path_init),
        return_exists: path_return.is_some(),
    }
}
