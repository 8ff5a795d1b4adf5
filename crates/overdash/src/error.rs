//! Error handling for the overdash simulator binary.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for simulator operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running the simulator.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(#[from] ron::error::SpannedError),
    /// Errors surfaced by the overlay controller.
    #[error("Controller error: {0}")]
    Engine(#[from] overdash_engine::Error),
}
