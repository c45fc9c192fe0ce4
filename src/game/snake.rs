use std::collections::{HashSet, VecDeque};

use super::coordinate::Coordinate;
use super::orientation::Orientation;
use super::surface::Surface;

/// Maximum number of turns buffered between two ticks
pub const TURN_QUEUE_CAPACITY: usize = 3;

/// How the body changes when the head advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Head moves forward, tail follows (length unchanged)
    Move,
    /// Head moves forward, tail stays (length + 1)
    Grow,
}

/// The snake on the playground
///
/// The body is stored tail first: the front of the deque is the tail, the
/// back is the head.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Coordinate>,
    orientation: Orientation,
    pending: VecDeque<Orientation>,
    cell_size: i32,
}

impl Snake {
    /// Create the starting snake: `length` cells along the top row, heading right
    pub fn new(cell_size: i32, length: usize) -> Self {
        let body = (0..length.max(1) as i32)
            .map(|i| Coordinate::new(i * cell_size, 0))
            .collect();

        Self {
            body,
            orientation: Orientation::Right,
            pending: VecDeque::with_capacity(TURN_QUEUE_CAPACITY),
            cell_size,
        }
    }

    /// Create a snake from explicit cells, tail first and head last
    ///
    /// Returns `None` if the body is empty or contains a cell twice.
    pub fn from_body(
        cell_size: i32,
        body: impl IntoIterator<Item = Coordinate>,
        orientation: Orientation,
    ) -> Option<Self> {
        let body: VecDeque<Coordinate> = body.into_iter().collect();
        let distinct: HashSet<&Coordinate> = body.iter().collect();
        if body.is_empty() || distinct.len() != body.len() {
            return None;
        }

        Some(Self {
            body,
            orientation,
            pending: VecDeque::with_capacity(TURN_QUEUE_CAPACITY),
            cell_size,
        })
    }

    /// Paint every body cell
    pub fn spawn<S: Surface>(&self, surface: &mut S) {
        for cell in &self.body {
            surface.draw_cell(cell.x, cell.y, self.cell_size, self.cell_size);
        }
    }

    pub fn head(&self) -> Coordinate {
        *self.body.back().expect("snake body is never empty")
    }

    pub fn tail(&self) -> Coordinate {
        *self.body.front().expect("snake body is never empty")
    }

    /// Body cells, tail first
    pub fn body(&self) -> impl ExactSizeIterator<Item = &Coordinate> + '_ {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (never true for a constructed snake)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    /// Turns waiting to be applied, oldest first
    pub fn pending(&self) -> impl Iterator<Item = &Orientation> + '_ {
        self.pending.iter()
    }

    pub fn occupies(&self, position: Coordinate) -> bool {
        self.body.contains(&position)
    }

    /// Buffer a turn for an upcoming tick
    ///
    /// Ignored when it reverses the orientation the snake will have once the
    /// already buffered turns are applied, or when the buffer is full.
    /// Returns whether the turn was queued.
    pub fn set_orientation(&mut self, orientation: Orientation) -> bool {
        let heading = self.pending.back().copied().unwrap_or(self.orientation);
        if heading.is_opposite(orientation) || self.pending.len() >= TURN_QUEUE_CAPACITY {
            return false;
        }
        self.pending.push_back(orientation);
        true
    }

    /// The orientation the next step will take, without consuming any turn
    pub fn next_orientation(&self) -> Orientation {
        self.pending
            .iter()
            .copied()
            .find(|o| !self.orientation.is_opposite(*o))
            .unwrap_or(self.orientation)
    }

    /// The cell the head would move into on the next step
    pub fn next_position(&self) -> Coordinate {
        self.head().stepped(self.next_orientation(), self.cell_size)
    }

    /// Consume buffered turns up to the one that applies and make it current
    ///
    /// Turns that reverse the current orientation are dropped on the way.
    pub fn commit_orientation(&mut self) -> Orientation {
        while let Some(next) = self.pending.pop_front() {
            if !self.orientation.is_opposite(next) {
                self.orientation = next;
                break;
            }
        }
        self.orientation
    }

    /// Commit the next orientation and return where the head is heading
    pub fn turn(&mut self) -> Coordinate {
        self.commit_orientation();
        self.head().stepped(self.orientation, self.cell_size)
    }

    /// Push a new head onto the body, dropping the tail unless growing
    ///
    /// Returns the vacated tail cell, if any.
    pub fn advance<S: Surface>(
        &mut self,
        position: Coordinate,
        growth: Growth,
        surface: &mut S,
    ) -> Option<Coordinate> {
        let removed = match growth {
            Growth::Move => self.body.pop_front(),
            Growth::Grow => None,
        };

        if let Some(cell) = removed {
            surface.erase_cell(cell.x, cell.y, self.cell_size, self.cell_size);
        }

        self.body.push_back(position);
        surface.draw_cell(position.x, position.y, self.cell_size, self.cell_size);

        removed
    }
}
