use crate::Coords;

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cell size must be positive, got {0}")]
    CellSize(i32),
    #[error("board dimensions must be positive, got {width}x{height}")]
    Dimensions { width: i32, height: i32 },
    #[error("cell size {cell_size} does not divide the {width}x{height} board")]
    Misaligned { width: i32, height: i32, cell_size: i32 },
    #[error("board needs room for a snake and its food, got a single cell")]
    TooSmall,
}

/// Grid geometry in pixels. Cells are addressed by the pixel coordinates of
/// their top-left corner, so every valid cell is a multiple of `cell_size`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl Board {
    pub fn new(width: i32, height: i32, cell_size: i32) -> Result<Self, ConfigError> {
        if cell_size <= 0 {
            return Err(ConfigError::CellSize(cell_size));
        }
        if width <= 0 || height <= 0 {
            return Err(ConfigError::Dimensions { width, height });
        }
        if width % cell_size != 0 || height % cell_size != 0 {
            return Err(ConfigError::Misaligned { width, height, cell_size });
        }

        let board = Board { width, height, cell_size };
        if board.cell_count() < 2 {
            return Err(ConfigError::TooSmall);
        }

        Ok(board)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Centre cell, snapped down onto the grid.
    pub fn center(&self) -> Coords {
        (self.columns() / 2 * self.cell_size, self.rows() / 2 * self.cell_size)
    }

    pub fn contains(&self, cell: Coords) -> bool {
        let (x, y) = cell;
        (0..self.width).contains(&x)
            && (0..self.height).contains(&y)
            && x % self.cell_size == 0
            && y % self.cell_size == 0
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Coords {
        let col = rng.gen_range(0..self.columns());
        let row = rng.gen_range(0..self.rows());
        (col * self.cell_size, row * self.cell_size)
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coords> + '_ {
        (0..self.rows()).flat_map(move |row| {
            (0..self.columns()).map(move |col| (col * self.cell_size, row * self.cell_size))
        })
    }
}
