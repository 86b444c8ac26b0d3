use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::board::{Board, ConfigError};

pub const DEFAULT_TICKS_PER_SECOND: u32 = 15;
const MAX_BOARD_PIXELS: i64 = 100_000;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn ticks_per_second(self) -> u32 {
        match self {
            Difficulty::Easy => 15,
            Difficulty::Medium => 25,
            Difficulty::Hard => 35,
        }
    }
}

/// Snake on a grid of extruded cubes, drawn in the terminal.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Board width in pixels.
    #[arg(long, default_value_t = 800, value_parser = clap::value_parser!(i32).range(1..=MAX_BOARD_PIXELS))]
    pub width: i32,
    /// Board height in pixels.
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(i32).range(1..=MAX_BOARD_PIXELS))]
    pub height: i32,
    /// Edge length of one cell in pixels. Must divide width and height.
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(i32).range(1..=MAX_BOARD_PIXELS))]
    pub cell_size: i32,
    /// Speed preset; overridden by --tps.
    #[arg(long, value_enum)]
    pub difficulty: Option<Difficulty>,
    /// Simulation steps per second.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub tps: Option<u32>,
    /// Start with sound disabled.
    #[arg(long)]
    pub mute: bool,
    /// Directory holding eat.mp3, game_over.mp3 and start.mp3.
    #[arg(long, value_name = "DIR", default_value = "sounds")]
    pub assets_dir: PathBuf,
    /// Draw the cell grid under the snake.
    #[arg(long)]
    pub show_grid: bool,
    /// Seed for food placement.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write logs to this file.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
    pub ticks_per_second: u32,
    pub sound_enabled: bool,
    pub assets_dir: PathBuf,
    pub show_grid: bool,
    pub seed: Option<u64>,
    pub log_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 800,
            height: 600,
            cell_size: 20,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            sound_enabled: true,
            assets_dir: PathBuf::from("sounds"),
            show_grid: false,
            seed: None,
            log_file: None,
        }
    }
}

impl GameConfig {
    pub fn board(&self) -> Result<Board, ConfigError> {
        Board::new(self.width, self.height, self.cell_size)
    }
}

impl From<CliArgs> for GameConfig {
    fn from(args: CliArgs) -> Self {
        let ticks_per_second = args
            .tps
            .or_else(|| args.difficulty.map(Difficulty::ticks_per_second))
            .unwrap_or(DEFAULT_TICKS_PER_SECOND);

        GameConfig {
            width: args.width,
            height: args.height,
            cell_size: args.cell_size,
            ticks_per_second,
            sound_enabled: !args.mute,
            assets_dir: args.assets_dir,
            show_grid: args.show_grid,
            seed: args.seed,
            log_file: args.log_file,
        }
    }
}
