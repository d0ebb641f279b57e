// Shortest-path query with tail-tip handling
//
// The feed can report the agent's tail tip on the very cell a route must end
// on. The query optionally searches a copy of the board with the end cell
// cleared so such routes are still found.

use log::debug;

use crate::search::{Path, PathFinder};
use crate::snapshot::Snapshot;
use crate::types::Coord;

/// How the end cell is treated before searching
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Clear the end cell when it lies further away than the stacked tip
    pub trim_tip: bool,
    /// Always clear the end cell
    pub prune_tip: bool,
}

impl QueryOptions {
    pub fn plain() -> Self {
        QueryOptions::default()
    }

    pub fn trim_tip() -> Self {
        QueryOptions {
            trim_tip: true,
            prune_tip: false,
        }
    }

    pub fn with_prune_tip(prune_tip: bool) -> Self {
        QueryOptions {
            trim_tip: false,
            prune_tip,
        }
    }
}

/// Runs one shortest-path query. The caller's snapshot is never mutated.
pub fn find_path<F: PathFinder + ?Sized>(
    finder: &F,
    snapshot: &Snapshot,
    start: Coord,
    end: Coord,
    options: QueryOptions,
) -> Option<Path> {
    let tip_stack = snapshot.agent().tip_stack();
    let distance = snapshot.distance(start, end) as usize;

    if options.prune_tip || (options.trim_tip && distance > tip_stack) {
        debug!(
            "Trimming tip of snake with {} tips stacked and {} away",
            tip_stack, distance
        );
        let mut trimmed = snapshot.clone();
        trimmed.clear(end);
        finder.shortest_path(&trimmed, start, end)
    } else {
        finder.shortest_path(snapshot, start, end)
    }
}
