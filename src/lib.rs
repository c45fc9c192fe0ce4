//! Grid Snake - the classic Snake game in the terminal
//!
//! This library provides:
//! - Core game logic: coordinates, the snake and the playground tick (game module)
//! - Tick scheduling on a dedicated task (session module)
//! - TUI rendering of the playground bitmap (render module)
//! - Keyboard mapping (input module)
//! - Keyboard play mode (modes module)
//! - Per-session play statistics (metrics module)

pub mod game;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod session;
