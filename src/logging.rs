//! File logging
//!
//! The terminal belongs to the game while it runs, so log records go to a
//! file instead of stderr.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Send `log` records at `level` and above to `path`, truncating it
pub fn init(path: &Path, level: LevelFilter) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    WriteLogger::init(level, config, file).context("Failed to initialize logger")?;
    Ok(())
}
