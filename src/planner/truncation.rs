// Tail-truncation lengths: 0, then 1, 2, 3, 5, 8, ... below the tail length

use std::iter::FusedIterator;

use crate::snapshot::Snake;

/// Lazy, finite sequence of how many tail cells to sacrifice.
///
/// Always yields `0` first so the untouched board is tried before anything is
/// given up; the Fibonacci steps after that stay strictly below the tail length.
#[derive(Debug, Clone)]
pub struct TruncationLengths {
    started: bool,
    current: usize,
    following: usize,
    limit: usize,
}

impl TruncationLengths {
    pub fn new(tail_len: usize) -> Self {
        TruncationLengths {
            started: false,
            current: 1,
            following: 2,
            limit: tail_len,
        }
    }

    pub fn for_snake(snake: &Snake) -> Self {
        TruncationLengths::new(snake.tail().len())
    }
}

impl Iterator for TruncationLengths {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if !self.started {
            self.started = true;
            return Some(0);
        }
        if self.current >= self.limit {
            return None;
        }

        let value = self.current;
        let sum = self.current + self.following;
        self.current = self.following;
        self.following = sum;
        Some(value)
    }
}

impl FusedIterator for TruncationLengths {}
