use std::fmt;
use std::str::FromStr;

use super::orientation::Orientation;

/// Separator between the two halves of a coordinate key
const KEY_SEPARATOR: char = '#';

/// A cell position on the playground, in pixels
///
/// Cells created by the game are always multiples of the grid size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Unique string key for this cell, `"x#y"`
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Decode a key produced by [`Coordinate::key`]
    ///
    /// Returns `None` unless the input is exactly two integers joined by `#`.
    pub fn from_key(key: &str) -> Option<Self> {
        let (x, y) = key.split_once(KEY_SEPARATOR)?;
        let x = x.parse().ok()?;
        let y = y.parse().ok()?;
        Some(Self { x, y })
    }

    /// The cell `distance` pixels away in the given orientation
    pub fn stepped(&self, orientation: Orientation, distance: i32) -> Self {
        let (dx, dy) = orientation.delta();
        Self {
            x: self.x + dx * distance,
            y: self.y + dy * distance,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.x, KEY_SEPARATOR, self.y)
    }
}

/// Error returned when a string is not a valid coordinate key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCoordinateError {
    input: String,
}

impl fmt::Display for ParseCoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid coordinate key {:?}, expected \"x#y\"", self.input)
    }
}

impl std::error::Error for ParseCoordinateError {}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ParseCoordinateError {
            input: s.to_string(),
        })
    }
}
