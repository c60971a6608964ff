use std::{fs::File, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use snake::{config::Options, game::SnakeGame};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let options = Options::parse();

    if let Some(path) = &options.log_file {
        init_logging(path)?;
    }

    // The game restores the terminal before returning, even on error
    let score = SnakeGame::new(options.difficulty)?.run()?;

    println!("Score: {}", score);
    Ok(())
}

// The terminal belongs to the game, so logs only ever go to a file
fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
