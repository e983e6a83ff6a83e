//! Error types for the game logic.

use thiserror::Error;

use crate::dome::Commodity;

/// Result alias for dome operations.
pub type Result<T> = std::result::Result<T, DomeError>;

/// Errors raised by `DomeState` operations.
///
/// Running out of a commodity is not an error; it is reported through
/// `DomeState::is_viable`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomeError {
    #[error("difficulty level {0} is out of range (expected 0-4)")]
    InvalidDifficulty(usize),

    #[error("{0} cannot be purchased")]
    NotPurchasable(Commodity),

    #[error("insufficient credits: need {needed}, have {available}")]
    InsufficientCredits { needed: i64, available: i64 },

    #[error("insufficient oxygen: need {needed}, have {available}")]
    InsufficientOxygen { needed: i64, available: i64 },
}

/// Errors raised while reading or writing the score file.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("score file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed score record on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}
