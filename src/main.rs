mod board;
mod clock;
mod config;
mod error;
mod food;
mod game;
mod input;
mod render;
mod snake;
mod sound;
mod term;

use std::{fs::File, io, sync::Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::{CliArgs, GameConfig};
use crate::game::GameSession;
use crate::sound::Mixer;
use crate::term::{TermCanvas, TermManager};

/// Pixel position of a cell's top-left corner on the board.
pub type Coords = (i32, i32);

fn main() -> Result<()> {
    let config = GameConfig::from(CliArgs::parse());
    init_logging(&config)?;

    // Fail on bad geometry before the terminal is taken over
    config.board().context("invalid board configuration")?;

    let mut term = TermManager::new();
    term.setup().context("failed to prepare the terminal")?;

    // The main game loop returns on quit; the terminal is restored either way
    let result = play(&config, &mut term);
    let score = settle(result, term.restore())?;

    println!("Final score: {}", score);
    Ok(())
}

/// A game error outranks a failed terminal restore, which is then only logged.
fn settle(result: Result<u64>, restored: io::Result<()>) -> Result<u64> {
    match (result, restored) {
        (Ok(score), Ok(())) => Ok(score),
        (Ok(_), Err(e)) => Err(e).context("failed to restore the terminal"),
        (Err(game), Err(e)) => {
            warn!(error = %e, "failed to restore the terminal");
            Err(game)
        }
        (Err(game), Ok(())) => Err(game),
    }
}

fn play(config: &GameConfig, term: &mut TermManager) -> Result<u64> {
    let canvas = TermCanvas::new(config.width, config.height).context("failed to read the terminal size")?;
    let mixer = Mixer::new(&config.assets_dir, config.sound_enabled);

    let mut session = GameSession::new(config, canvas, mixer)?;
    let score = session.run(term, config.ticks_per_second)?;
    Ok(score)
}

fn init_logging(config: &GameConfig) -> Result<()> {
    // The terminal belongs to the game, so logs only go to a file
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
