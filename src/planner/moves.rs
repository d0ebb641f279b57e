// Maps the first step of a path to a move

use super::PlanError;
use crate::search::Path;
use crate::snapshot::Snapshot;
use crate::types::{Coord, Direction};

/// Horizontal difference wins over vertical; rows grow downwards.
pub fn map_move(head: Coord, target: Coord) -> Direction {
    let dx = head.x - target.x;
    let dy = head.y - target.y;
    if dx != 0 {
        if dx < 0 {
            Direction::Right
        } else {
            Direction::Left
        }
    } else if dy < 0 {
        Direction::Down
    } else {
        Direction::Up
    }
}

/// Direction of `path[1]` from the head
pub fn first_step(head: Coord, path: Option<&Path>) -> Result<Direction, PlanError> {
    match path {
        Some(p) if p.len() >= 2 => Ok(map_move(head, p[1])),
        _ => Err(PlanError::NoMove),
    }
}

/// First open neighbour of the head. When boxed in, the first move that at
/// least stays on the board, and `Up` if even that fails.
pub fn fallback_direction(snapshot: &Snapshot) -> Direction {
    let head = snapshot.agent().head();
    let dirs = Direction::all();
    dirs.iter()
        .copied()
        .find(|d| snapshot.is_vacant(d.apply(&head)))
        .or_else(|| dirs.iter().copied().find(|d| snapshot.in_bounds(d.apply(&head))))
        .unwrap_or(Direction::Up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Occupant;

    fn c(x: i32, y: i32) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_map_move_axis_cases() {
        let head = c(5, 5);
        assert_eq!(map_move(head, c(5, 4)), Direction::Up);
        assert_eq!(map_move(head, c(5, 6)), Direction::Down);
        assert_eq!(map_move(head, c(4, 5)), Direction::Left);
        assert_eq!(map_move(head, c(6, 5)), Direction::Right);
    }

    #[test]
    fn test_map_move_horizontal_takes_priority() {
        assert_eq!(map_move(c(5, 5), c(6, 4)), Direction::Right);
        assert_eq!(map_move(c(5, 5), c(4, 6)), Direction::Left);
        // same cell falls through to up
        assert_eq!(map_move(c(5, 5), c(5, 5)), Direction::Up);
    }

    #[test]
    fn test_first_step_rejects_degenerate_paths() {
        let head = c(1, 1);
        assert_eq!(first_step(head, None), Err(PlanError::NoMove));
        assert_eq!(first_step(head, Some(&vec![head])), Err(PlanError::NoMove));
        assert_eq!(first_step(head, Some(&vec![head, c(1, 2)])), Ok(Direction::Down));
    }

    #[test]
    fn test_fallback_direction_skips_blocked_cells() {
        let mut s = Snapshot::new(3, 3).unwrap();
        s.add_agent("me", vec![c(1, 0), c(1, 1)]).unwrap();
        // up is off the board, down is the neck
        assert_eq!(fallback_direction(&s), Direction::Left);

        // boxed in against the top edge: stay on the board
        s.set(c(0, 0), Some(Occupant::Wall));
        s.set(c(2, 0), Some(Occupant::Wall));
        assert_eq!(fallback_direction(&s), Direction::Down);
    }
}
