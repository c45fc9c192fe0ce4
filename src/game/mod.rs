//! Core game logic module for Snake
//!
//! This module contains all the game logic without any terminal or timer
//! dependencies. Drawing goes through the [`Surface`] trait so the same
//! playground can paint onto a terminal canvas or a test bitmap.

pub mod config;
pub mod coordinate;
pub mod orientation;
pub mod playground;
pub mod snake;
pub mod surface;

// Re-export commonly used types
pub use config::GameConfig;
pub use coordinate::{Coordinate, ParseCoordinateError};
pub use orientation::Orientation;
pub use playground::{CollisionType, Playground, Status, TickOutcome};
pub use snake::{Growth, Snake, TURN_QUEUE_CAPACITY};
pub use surface::{PixelCanvas, Surface};
