//! Error types for Brickwork operations.
//!
//! [`BrickworkError`] wraps the module-level errors so callers that drive
//! several kinds of operation can use a single `?`-compatible type.

use std::io;

use thiserror::Error;

use crate::{
    config::ConfigError,
    layout::LayoutError,
    model::{BlockError, ConnectionError},
};

/// The main error type for Brickwork operations.
#[derive(Debug, Error)]
pub enum BrickworkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Block error: {0}")]
    Block(#[from] BlockError),

    #[error("Export error: {0}")]
    Export(String),
}
