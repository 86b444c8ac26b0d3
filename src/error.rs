use std::io;

use thiserror::Error;

use crate::board::ConfigError;

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
    #[cfg(feature = "audio")]
    #[error("audio backend failed: {0}")]
    Audio(String),
}
