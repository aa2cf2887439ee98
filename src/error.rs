use std::io;
use thiserror::Error;

/// Errors surfaced by seed parsing and the output adapters.
///
/// Generation itself is total over a valid seed; everything else here comes
/// from the edges (input parsing, settings, files).
#[derive(Debug, Error)]
pub enum ForestError {
    #[error("invalid seed hash {0:?}: expected hex digits")]
    InvalidSeed(String),

    #[error("invalid color {0:?}: expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid canvas size {width}x{height}: both sides must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ForestError>;
