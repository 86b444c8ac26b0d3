use std::collections::VecDeque;

use crate::board::Board;
use crate::Coords;
use Direction::*;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn offset(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Coords },
    Crashed(Collision),
}

/// Body segments ordered head first. A step pushes a new head; the tail is
/// only released afterwards by [`Snake::settle_tail`], so food can be eaten
/// between the two halves of a move.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
    pending_growth: u32,
}

impl Snake {
    pub fn new(pos: Coords, direction: Direction) -> Self {
        Snake { body: VecDeque::from(vec![pos]), direction, pending_growth: 0 }
    }

    /// Builds a snake from explicit segments, head first.
    #[cfg(test)]
    pub fn from_segments<I: IntoIterator<Item = Coords>>(segments: I, direction: Direction) -> Self {
        let body: VecDeque<Coords> = segments.into_iter().collect();
        assert!(!body.is_empty(), "a snake needs at least one segment");
        Snake { body, direction, pending_growth: 0 }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[cfg(test)]
    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Turning straight back into the neck is refused once the snake has one,
    /// otherwise the next step would always bite. Returns whether the heading
    /// changed.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction {
            return false;
        }
        if self.body.len() > 1 && new_direction == self.direction.opposite() {
            return false;
        }

        self.direction = new_direction;
        true
    }

    pub fn next_head(&self, cell_size: i32) -> Coords {
        let (dx, dy) = self.direction.offset();
        let head = self.head();
        (head.0 + dx * cell_size, head.1 + dy * cell_size)
    }

    /// Pushes the new head unless it would leave the board or land on the body.
    /// The tail cell counts as free when it is about to be released this step.
    pub fn move_step(&mut self, board: &Board) -> MoveResult {
        let new_head = self.next_head(board.cell_size());

        if !board.contains(new_head) {
            return Crashed(Collision::Wall);
        }

        let keeps_tail = if self.pending_growth == 0 { self.body.len() - 1 } else { self.body.len() };
        if self.body.iter().take(keeps_tail).any(|seg| *seg == new_head) {
            return Crashed(Collision::Body);
        }

        self.body.push_front(new_head);
        Moved { new_head }
    }

    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    /// Second half of a step: drops the tail, or consumes one pending growth.
    pub fn settle_tail(&mut self) -> Option<Coords> {
        if self.pending_growth == 0 {
            self.body.pop_back()
        } else {
            self.pending_growth -= 1;
            None
        }
    }
}
