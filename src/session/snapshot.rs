use std::time::Duration;

use rand::Rng;

use crate::game::{Coordinate, PixelCanvas, Playground, Status};

/// Everything the front end needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub canvas: PixelCanvas,
    pub grid_size: i32,
    pub level: u32,
    pub interval: Duration,
    pub status: Status,
    pub length: usize,
    pub head: Coordinate,
    pub food: Option<Coordinate>,
    /// Ticks played so far
    pub ticks: u64,
}

impl Snapshot {
    pub fn capture<R: Rng>(playground: &Playground<PixelCanvas, R>, ticks: u64) -> Self {
        Self {
            canvas: playground.surface().clone(),
            grid_size: playground.grid_size(),
            level: playground.level(),
            interval: playground.interval(),
            status: playground.status(),
            length: playground.snake().len(),
            head: playground.snake().head(),
            food: playground.food(),
            ticks,
        }
    }
}
