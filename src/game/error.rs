//! Error types for game module
//!
//! Only construction-time failures live here: a square outside the 6x6 grid,
//! unparseable algebraic notation, or an illegal promotion target. Rule
//! outcomes (illegal moves, wrong turn, editor misuse) are reported through
//! [`crate::service::MoveResult`] and [`crate::service::EditResult`] instead.

use crate::game::types::PieceKind;

/// Errors that can occur while constructing game values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// Row or column outside `0..=5`
    #[error("Invalid position ({row}, {col}): row and column must be in range 0..=5")]
    InvalidPosition { row: i32, col: i32 },

    /// Square notation that is not `a1`..`f6`
    #[error("Invalid algebraic notation: {notation}")]
    InvalidNotation { notation: String },

    /// Pawns may only promote to queen, rook, bishop or knight
    #[error("Invalid promotion piece: {kind}")]
    InvalidPromotion { kind: PieceKind },
}

/// Result type alias for game construction
pub type GameResult<T> = Result<T, GameError>;
