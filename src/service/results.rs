//! Outcome types for session operations
//!
//! Rule violations and editor misuse are ordinary outcomes, not errors, so
//! every operation returns one of these enums and the caller decides how to
//! present each variant.

use crate::game::components::Move;
use crate::game::resources::Game;

/// Outcome of a move attempt
#[derive(Debug, Clone, PartialEq)]
pub enum MoveResult {
    /// Move applied; `game` is the stored snapshot after it
    Success { game: Game, mv: Move },
    /// Rejected with a reason fit for display
    InvalidMove { reason: String },
    /// Pawn reaches the last row but no promotion kind was supplied
    ///
    /// Nothing was stored; resubmit the same move with a kind.
    PromotionRequired,
    GameNotFound,
    /// Checkmate, stalemate or draw already reached
    GameOver,
}

impl MoveResult {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        MoveResult::InvalidMove {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MoveResult::Success { .. })
    }

    /// The stored game after a successful move
    pub fn game(&self) -> Option<&Game> {
        match self {
            MoveResult::Success { game, .. } => Some(game),
            _ => None,
        }
    }
}

/// Outcome of an editor or undo operation
#[derive(Debug, Clone, PartialEq)]
pub enum EditResult {
    Success { game: Game },
    InvalidOperation { reason: String },
    GameNotFound,
    /// Caller is not the game's creator
    NotAuthorized,
}

impl EditResult {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EditResult::InvalidOperation {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, EditResult::Success { .. })
    }

    /// The resulting game, if the operation succeeded
    pub fn game(&self) -> Option<&Game> {
        match self {
            EditResult::Success { game } => Some(game),
            _ => None,
        }
    }
}
