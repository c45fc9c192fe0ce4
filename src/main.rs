use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::logging;
use grid_snake::modes::HumanMode;
use log::info;
use simplelog::LevelFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a grid, speeding up with every bite")]
struct Cli {
    /// JSON file with game settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of grid cells across
    #[arg(long)]
    columns: Option<usize>,

    /// Number of grid cells down
    #[arg(long)]
    rows: Option<usize>,

    /// Cell edge in pixels (multiples of 3 draw the classic food glyph)
    #[arg(long)]
    grid_size: Option<i32>,

    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log
    #[arg(long, default_value = "grid_snake.log")]
    log_file: PathBuf,

    /// Log debug records (food spawns, level ups, ignored turns)
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::load(path)?,
            None => GameConfig::default(),
        };

        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }

        if let Err(e) = config.validate() {
            bail!("Invalid game settings: {}", e);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::init(&cli.log_file, level)?;

    let config = cli.game_config()?;
    info!(
        "Starting grid_snake: {}x{} cells of {} px, seed {:?}",
        config.columns, config.rows, config.grid_size, cli.seed
    );

    let mut human_mode = HumanMode::new(config, cli.seed);
    human_mode.run().await?;

    info!("Bye");
    Ok(())
}
