//! Terminal front end: turns playground snapshots into ratatui widgets

pub mod renderer;

pub use renderer::{Renderer, canvas_lines, framed_size};
