use serde::{Deserialize, Serialize};

/// Direction the snake travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Left,
    Right,
    Up,
    Down,
}

impl Orientation {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Orientation) -> bool {
        self.opposite() == other
    }

    pub fn opposite(&self) -> Orientation {
        match self {
            Orientation::Left => Orientation::Right,
            Orientation::Right => Orientation::Left,
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
        }
    }

    /// Returns the unit delta (dx, dy) for one step, y grows downwards
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Orientation::Left => (-1, 0),
            Orientation::Right => (1, 0),
            Orientation::Up => (0, -1),
            Orientation::Down => (0, 1),
        }
    }
}
