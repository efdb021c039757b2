//! Error types shared by the simulation and the wrapper

use thiserror::Error;

/// Everything that can go wrong around a match.
///
/// The end of a match is not an error; see `sim::TickStatus`.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("rigid matrix underflow at ({x}, {y})")]
    MatrixUnderflow { x: i32, y: i32 },
    #[error("rigid matrix overflow at ({x}, {y})")]
    MatrixOverflow { x: i32, y: i32 },
    #[error("transient input error: {0}")]
    TransientInput(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl GameError {
    /// Fatal errors abort the match; everything else is recoverable
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GameError::TransientInput(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
