// Per-turn board snapshot used by the planner
//
// The snapshot is a plain value: cloning it gives an independent copy that a
// strategy may mutate freely. Cells are addressed as (column, row) with row 0
// at the top, so the API's bottom-up `y` is flipped on construction.

use std::fmt;

use crate::types::{Battlesnake, Board, Coord};

/// What sits on an occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Wall,
    /// Index into `Snapshot::snakes`
    Snake(usize),
}

/// Reasons a wire board cannot be turned into a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    InvalidDimensions { width: i32, height: i32 },
    MissingAgent(String),
    EmptyBody(String),
    OutOfBounds(Coord),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::InvalidDimensions { width, height } => {
                write!(f, "invalid board dimensions {}x{}", width, height)
            }
            SnapshotError::MissingAgent(id) => write!(f, "snake '{}' is not on the board", id),
            SnapshotError::EmptyBody(id) => write!(f, "snake '{}' has an empty body", id),
            SnapshotError::OutOfBounds(c) => write!(f, "cell ({}, {}) is out of bounds", c.x, c.y),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// A snake as seen by the planner, head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    pub id: String,
    pub body: Vec<Coord>,
}

impl Snake {
    pub fn new(id: impl Into<String>, body: Vec<Coord>) -> Self {
        Snake { id: id.into(), body }
    }

    pub fn head(&self) -> Coord {
        self.body[0]
    }

    /// Body without the head
    pub fn tail(&self) -> &[Coord] {
        &self.body[1..]
    }

    /// Last body cell
    pub fn tip(&self) -> Coord {
        self.body[self.body.len() - 1]
    }

    /// Number of trailing body entries stacked on the tip coordinate.
    /// Freshly spawned snakes report several segments on one cell.
    pub fn tip_stack(&self) -> usize {
        let tip = self.tip();
        self.body.iter().rev().take_while(|c| **c == tip).count()
    }
}

/// Largest accepted board side
pub const MAX_SIDE: i32 = 1024;

/// Occupancy grid plus snake and food registries for one turn
#[derive(Debug, Clone)]
pub struct Snapshot {
    width: i32,
    height: i32,
    cells: Vec<Option<Occupant>>,
    snakes: Vec<Snake>,
    agent: usize,
    food: Vec<Coord>,
}

impl Snapshot {
    /// Creates an empty grid. The agent must be registered with `add_agent`.
    pub fn new(width: i32, height: i32) -> Result<Self, SnapshotError> {
        let invalid = SnapshotError::InvalidDimensions { width, height };
        if !(1..=MAX_SIDE).contains(&width) || !(1..=MAX_SIDE).contains(&height) {
            return Err(invalid);
        }
        let size = (width as usize).checked_mul(height as usize).ok_or(invalid)?;

        Ok(Snapshot {
            width,
            height,
            cells: vec![None; size],
            snakes: Vec::new(),
            agent: 0,
            food: Vec::new(),
        })
    }

    /// Builds the planner's view from the API board.
    /// With `hazards_as_walls` set, hazard cells are marked as walls.
    pub fn from_wire(
        board: &Board,
        you: &Battlesnake,
        hazards_as_walls: bool,
    ) -> Result<Self, SnapshotError> {
        let mut snapshot = Snapshot::new(board.width, board.height)?;
        let flip = |c: &Coord| -> Result<Coord, SnapshotError> {
            (board.height - 1)
                .checked_sub(c.y)
                .map(|y| Coord::new(c.x, y))
                .ok_or(SnapshotError::OutOfBounds(*c))
        };

        let agent_present = board.snakes.iter().any(|s| s.id == you.id);
        if !agent_present {
            return Err(SnapshotError::MissingAgent(you.id.clone()));
        }

        for snake in &board.snakes {
            let body = snake.body.iter().map(flip).collect::<Result<Vec<Coord>, _>>()?;
            if snake.id == you.id {
                snapshot.add_agent(snake.id.clone(), body)?;
            } else {
                snapshot.add_snake(snake.id.clone(), body)?;
            }
        }

        for food in &board.food {
            snapshot.add_food(flip(food)?)?;
        }

        if hazards_as_walls {
            for hazard in &board.hazards {
                let cell = flip(hazard)?;
                snapshot.check_bounds(cell)?;
                if snapshot.is_vacant(cell) && !snapshot.food.contains(&cell) {
                    snapshot.set(cell, Some(Occupant::Wall));
                }
            }
        }

        Ok(snapshot)
    }

    /// Registers a rival snake and marks its whole body
    pub fn add_snake(&mut self, id: impl Into<String>, body: Vec<Coord>) -> Result<usize, SnapshotError> {
        let id = id.into();
        if body.is_empty() {
            return Err(SnapshotError::EmptyBody(id));
        }
        for cell in &body {
            self.check_bounds(*cell)?;
        }

        let idx = self.snakes.len();
        for cell in &body {
            self.set(*cell, Some(Occupant::Snake(idx)));
        }
        self.snakes.push(Snake::new(id, body));
        Ok(idx)
    }

    /// Registers this engine's snake. Its head cell is left vacant.
    pub fn add_agent(&mut self, id: impl Into<String>, body: Vec<Coord>) -> Result<usize, SnapshotError> {
        let idx = self.add_snake(id, body)?;
        let head = self.snakes[idx].head();
        if self.occupant(head) == Some(Occupant::Snake(idx)) {
            self.set(head, None);
        }
        self.agent = idx;
        Ok(idx)
    }

    pub fn add_food(&mut self, cell: Coord) -> Result<(), SnapshotError> {
        self.check_bounds(cell)?;
        self.food.push(cell);
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn food(&self) -> &[Coord] {
        &self.food
    }

    /// Number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn agent_index(&self) -> usize {
        self.agent
    }

    pub fn agent(&self) -> &Snake {
        &self.snakes[self.agent]
    }

    pub fn in_bounds(&self, cell: Coord) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    fn check_bounds(&self, cell: Coord) -> Result<(), SnapshotError> {
        if self.in_bounds(cell) {
            Ok(())
        } else {
            Err(SnapshotError::OutOfBounds(cell))
        }
    }

    fn index(&self, cell: Coord) -> usize {
        (cell.y * self.width + cell.x) as usize
    }

    /// Occupant of an in-bounds cell; `None` for vacant or out-of-bounds cells
    pub fn occupant(&self, cell: Coord) -> Option<Occupant> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.cells[self.index(cell)]
    }

    pub fn is_vacant(&self, cell: Coord) -> bool {
        self.in_bounds(cell) && self.cells[self.index(cell)].is_none()
    }

    /// Writes a cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: Coord, occupant: Option<Occupant>) {
        if self.in_bounds(cell) {
            let idx = self.index(cell);
            self.cells[idx] = occupant;
        }
    }

    pub fn clear(&mut self, cell: Coord) {
        self.set(cell, None);
    }

    /// Manhattan distance between two cells
    pub fn distance(&self, a: Coord, b: Coord) -> i32 {
        a.distance(&b)
    }

    /// Vacates the last `count` body cells of the agent.
    /// Returns the vacated cell closest to the head, or `None` when nothing
    /// was vacated. The head itself is never vacated.
    pub fn vacate_agent_tail(&mut self, count: usize) -> Option<Coord> {
        let body_len = self.agent().body.len();
        let count = count.min(body_len.saturating_sub(1));
        if count == 0 {
            return None;
        }

        let start = body_len - count;
        let freed: Vec<Coord> = self.agent().body[start..].to_vec();
        for cell in &freed {
            self.clear(*cell);
        }
        freed.first().copied()
    }

    /// In-bounds vacant neighbours of a cell, in up/down/left/right order
    pub fn open_neighbours(&self, cell: Coord) -> Vec<Coord> {
        crate::types::Direction::all()
            .iter()
            .map(|d| d.apply(&cell))
            .filter(|c| self.is_vacant(*c))
            .collect()
    }

    /// ASCII rendering for debug logs: `H` agent head, `S` snake, `#` wall, `*` food
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        let head = self.agent().head();
        for y in 0..self.height {
            for x in 0..self.width {
                let cell = Coord::new(x, y);
                let ch = if cell == head {
                    'H'
                } else {
                    match self.occupant(cell) {
                        Some(Occupant::Wall) => '#',
                        Some(Occupant::Snake(_)) => 'S',
                        None if self.food.contains(&cell) => '*',
                        None => '.',
                    }
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
