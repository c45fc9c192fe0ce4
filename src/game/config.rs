use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Largest playground accepted, in pixels (4096 x 4096)
pub const MAX_PIXELS: usize = 1 << 24;

/// Slowest accepted starting tick, one minute
pub const MAX_INTERVAL_MS: u64 = 60_000;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of grid cells across
    pub columns: usize,
    /// Number of grid cells down
    pub rows: usize,
    /// Edge length of one grid cell in pixels
    pub grid_size: i32,
    /// Length of the snake when it is thrown in
    pub initial_snake_length: usize,

    /// Tick interval before the first level up, in milliseconds
    pub initial_interval_ms: u64,
    /// Fastest tick interval, in milliseconds (about 60 ticks per second)
    pub min_interval_ms: u64,
    /// Run the next tick immediately after eating instead of waiting
    pub instant_tick_after_eating: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            columns: 24,
            rows: 14,
            grid_size: 3,
            initial_snake_length: 10,
            initial_interval_ms: 500,
            min_interval_ms: 17,
            instant_tick_after_eating: true,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom grid
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(12, 8)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(36, 20)
    }

    /// Read a configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults. The result is validated.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to parse config file")?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid config {:?}: {}", path, e))?;
        Ok(config)
    }

    /// Playground width in pixels
    pub fn width(&self) -> i32 {
        self.columns as i32 * self.grid_size
    }

    /// Playground height in pixels
    pub fn height(&self) -> i32 {
        self.rows as i32 * self.grid_size
    }

    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Validate configuration parameters
    ///
    /// `Ok(())` if the game can be played with these settings, `Err(String)`
    /// describing the first bad field otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size <= 0 {
            return Err(format!("grid_size must be positive, got {}", self.grid_size));
        }

        if self.columns == 0 || self.rows == 0 {
            return Err(format!(
                "grid must have at least one cell, got {}x{}",
                self.columns, self.rows
            ));
        }

        let pixels = self
            .columns
            .saturating_mul(self.rows)
            .saturating_mul(self.grid_size as usize)
            .saturating_mul(self.grid_size as usize);
        if pixels > MAX_PIXELS {
            return Err(format!(
                "playground of {}x{} cells at {} px is too large, at most {} pixels",
                self.columns, self.rows, self.grid_size, MAX_PIXELS
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        if self.initial_snake_length > self.columns {
            return Err(format!(
                "initial_snake_length ({}) cannot exceed columns ({})",
                self.initial_snake_length, self.columns
            ));
        }

        if self.min_interval_ms == 0 {
            return Err("min_interval_ms must be at least 1".to_string());
        }

        if self.initial_interval_ms > MAX_INTERVAL_MS {
            return Err(format!(
                "initial_interval_ms must be at most {}, got {}",
                MAX_INTERVAL_MS, self.initial_interval_ms
            ));
        }

        if self.initial_interval_ms < self.min_interval_ms {
            return Err(format!(
                "initial_interval_ms ({}) cannot be below min_interval_ms ({})",
                self.initial_interval_ms, self.min_interval_ms
            ));
        }

        Ok(())
    }
}
